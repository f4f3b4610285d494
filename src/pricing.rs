//! Cart line pricing and cart totals.
//!
//! Everything here is pure; the repositories call these before writing so
//! the stored numbers always match what the functions compute.

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::Serialize;

use crate::entities::{album, cart_product, cart_product::ContentKind};
use crate::error::{StoreError, StoreResult};
use crate::validation::ensure_price;

/// Anything that can be put in a cart.
pub trait Priced {
    fn unit_price(&self) -> Decimal;
    fn display_name(&self) -> &str;
}

impl Priced for album::Model {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Unresolved pointer to a purchasable entity: kind tag plus id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ItemRef {
    pub kind: ContentKind,
    pub id: i32,
}

impl ItemRef {
    pub fn album(id: i32) -> Self {
        Self {
            kind: ContentKind::Album,
            id,
        }
    }

    pub async fn resolve<C: ConnectionTrait>(&self, db: &C) -> StoreResult<Purchasable> {
        Purchasable::resolve(db, self.kind, self.id).await
    }
}

/// A resolved cart line target.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum Purchasable {
    Album(album::Model),
}

impl Purchasable {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Album(_) => ContentKind::Album,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Self::Album(album) => album.id,
        }
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    /// Loads the item a cart line points at.
    pub async fn resolve<C: ConnectionTrait>(
        db: &C,
        kind: ContentKind,
        id: i32,
    ) -> StoreResult<Self> {
        match kind {
            ContentKind::Album => album::Entity::find_by_id(id)
                .one(db)
                .await?
                .map(Self::Album)
                .ok_or_else(|| StoreError::not_found("album", id)),
        }
    }
}

impl Priced for Purchasable {
    fn unit_price(&self) -> Decimal {
        match self {
            Self::Album(album) => album.unit_price(),
        }
    }

    fn display_name(&self) -> &str {
        match self {
            Self::Album(album) => album.display_name(),
        }
    }
}

impl From<album::Model> for Purchasable {
    fn from(album: album::Model) -> Self {
        Self::Album(album)
    }
}

/// Money columns are `DECIMAL(9, 2)`.
pub const MONEY_SCALE: u32 = 2;

/// `quantity * unit_price`, refusing quantities below one and negative prices.
pub fn line_final_price(quantity: i32, unit_price: Decimal) -> StoreResult<Decimal> {
    if quantity < 1 {
        return Err(StoreError::InvalidQuantity(quantity));
    }
    ensure_price(unit_price)?;
    Ok(Decimal::from(quantity) * unit_price.round_dp(MONEY_SCALE))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub total_products: i32,
    pub final_price: Decimal,
}

impl Default for CartTotals {
    fn default() -> Self {
        Self {
            total_products: 0,
            final_price: Decimal::ZERO,
        }
    }
}

/// Sums quantities and line prices. A product count past `i32::MAX` is
/// reported as an invalid quantity.
pub fn summarize_lines<'a, I>(lines: I) -> StoreResult<CartTotals>
where
    I: IntoIterator<Item = &'a cart_product::Model>,
{
    let mut totals = CartTotals::default();
    for line in lines {
        totals.total_products = totals
            .total_products
            .checked_add(line.quantity)
            .ok_or(StoreError::InvalidQuantity(line.quantity))?;
        totals.final_price += line.final_price;
    }
    totals.final_price = totals.final_price.round_dp(MONEY_SCALE);
    Ok(totals)
}
