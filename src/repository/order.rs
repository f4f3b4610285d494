use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument, warn};

use crate::entities::{cart, cart_product, order, order::BuyingType, order::Status};
use crate::error::{StoreError, StoreResult};
use crate::repository::cart::recompute_cart_totals;

#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<DatabaseConnection>,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Turns an open, non-empty cart into a `new` order and marks the cart
    /// `in_order`.
    #[instrument(skip(self))]
    pub async fn checkout(
        &self,
        cart_id: i32,
        buying_type: BuyingType,
        comment: Option<String>,
    ) -> StoreResult<order::Model> {
        let txn = self.db.begin().await?;

        let cart = cart::Entity::find_by_id(cart_id)
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::not_found("cart", cart_id))?;
        if cart.in_order {
            warn!(cart_id, "cart was already checked out");
            return Err(StoreError::CartInOrder(cart_id));
        }

        let lines = cart_product::Entity::find()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .count(&txn)
            .await?;
        if lines == 0 {
            return Err(StoreError::EmptyCart(cart_id));
        }

        let cart = recompute_cart_totals(&txn, cart_id).await?;
        let final_price = cart.final_price;
        let owner_id = cart.owner_id;

        let mut entry: cart::ActiveModel = cart.into();
        entry.in_order = Set(true);
        entry.update(&txn).await?;

        let order = order::ActiveModel {
            customer_id: Set(owner_id),
            cart_id: Set(Some(cart_id)),
            status: Set(Status::New),
            buying_type: Set(buying_type),
            final_price: Set(final_price),
            comment: Set(comment),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(order_id = order.id, cart_id, %final_price, "order placed");
        Ok(order)
    }

    pub async fn get(&self, id: i32) -> StoreResult<order::Model> {
        order::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    pub async fn list_for_customer(&self, customer_id: i32) -> StoreResult<Vec<order::Model>> {
        Ok(order::Entity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn list_by_status(&self, status: Status) -> StoreResult<Vec<order::Model>> {
        Ok(order::Entity::find()
            .filter(order::Column::Status.eq(status))
            .order_by_asc(order::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Moves the order one step along new → in_progress → is_ready → completed.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: i32) -> StoreResult<order::Model> {
        let order = self.get(id).await?;
        let next = order.status.next().ok_or(StoreError::InvalidTransition {
            from: order.status,
            to: order.status,
        })?;
        self.write_status(order, next).await
    }

    /// Accepts only the status right after the current one. Setting the
    /// current status again changes nothing.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i32, status: Status) -> StoreResult<order::Model> {
        let order = self.get(id).await?;
        if order.status == status {
            return Ok(order);
        }
        if order.status.next() != Some(status) {
            warn!(id, from = %order.status, to = %status, "rejected order status change");
            return Err(StoreError::InvalidTransition {
                from: order.status,
                to: status,
            });
        }
        self.write_status(order, status).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = order::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("order", id));
        }
        info!(id, "order deleted");
        Ok(())
    }

    async fn write_status(&self, order: order::Model, status: Status) -> StoreResult<order::Model> {
        let from = order.status;
        let mut entry: order::ActiveModel = order.into();
        entry.status = Set(status);
        let order = entry.update(self.db.as_ref()).await?;
        info!(order_id = order.id, %from, to = %status, "order status changed");
        Ok(order)
    }
}
