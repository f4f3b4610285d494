use rust_decimal::Decimal;
use thiserror::Error;

use crate::entities::order::Status;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("price must not be negative, got {0}")]
    NegativePrice(Decimal),

    #[error("stock must not be negative, got {0}")]
    NegativeStock(i32),

    #[error("Failed to validate: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("cart product {line_id} does not belong to cart {cart_id}")]
    LineNotInCart { line_id: i32, cart_id: i32 },

    #[error("cart {0} is already part of an order")]
    CartInOrder(i32),

    #[error("cart {0} has no products")]
    EmptyCart(i32),

    #[error("order cannot move from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
