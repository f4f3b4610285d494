//! Carts and their lines.
//!
//! Every write to `cart_product` goes through [`save_line`] or a delete
//! followed by [`recompute_cart_totals`], inside one transaction, so a
//! cart's denormalized totals never drift from its lines.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::entities::{cart, cart_product, customer};
use crate::error::{StoreError, StoreResult};
use crate::pricing::{line_final_price, summarize_lines, CartTotals, ItemRef, Priced, Purchasable};

/// Writes `totals` of the lines currently stored for `cart_id` onto the cart.
pub(crate) async fn recompute_cart_totals<C: ConnectionTrait>(
    db: &C,
    cart_id: i32,
) -> StoreResult<cart::Model> {
    let cart = load_cart(db, cart_id).await?;
    let lines = cart_product::Entity::find()
        .filter(cart_product::Column::CartId.eq(cart_id))
        .all(db)
        .await?;
    let CartTotals {
        total_products,
        final_price,
    } = summarize_lines(&lines)?;

    let mut entry: cart::ActiveModel = cart.into();
    entry.total_products = Set(total_products);
    entry.final_price = Set(final_price);
    let cart = entry.update(db).await?;
    debug!(cart_id, total_products, %final_price, "cart totals recomputed");
    Ok(cart)
}

async fn load_cart<C: ConnectionTrait>(db: &C, cart_id: i32) -> StoreResult<cart::Model> {
    cart::Entity::find_by_id(cart_id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("cart", cart_id))
}

async fn load_open_cart<C: ConnectionTrait>(db: &C, cart_id: i32) -> StoreResult<cart::Model> {
    let cart = load_cart(db, cart_id).await?;
    if cart.in_order {
        warn!(cart_id, "rejected change to a cart that is already ordered");
        return Err(StoreError::CartInOrder(cart_id));
    }
    Ok(cart)
}

async fn load_line<C: ConnectionTrait>(db: &C, line_id: i32) -> StoreResult<cart_product::Model> {
    cart_product::Entity::find_by_id(line_id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("cart product", line_id))
}

/// Stores a line with `final_price = quantity * item price`, inserting when
/// `line_id` is `None` and updating that row in place otherwise, then
/// refreshes the cart totals.
async fn save_line<C: ConnectionTrait>(
    db: &C,
    line_id: Option<i32>,
    cart: &cart::Model,
    item: &Purchasable,
    quantity: i32,
) -> StoreResult<cart_product::Model> {
    let final_price = line_final_price(quantity, item.unit_price())?;
    let item_ref = item.item_ref();

    let line = match line_id {
        Some(id) => {
            let mut entry: cart_product::ActiveModel = load_line(db, id).await?.into();
            entry.content_kind = Set(item_ref.kind);
            entry.object_id = Set(item_ref.id);
            entry.quantity = Set(quantity);
            entry.final_price = Set(final_price);
            entry.update(db).await?
        }
        None => {
            cart_product::ActiveModel {
                customer_id: Set(cart.owner_id),
                cart_id: Set(cart.id),
                content_kind: Set(item_ref.kind),
                object_id: Set(item_ref.id),
                quantity: Set(quantity),
                final_price: Set(final_price),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    recompute_cart_totals(db, cart.id).await?;
    Ok(line)
}

#[derive(Clone)]
pub struct CartRepository {
    db: Arc<DatabaseConnection>,
}

impl CartRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, owner_id: i32, for_anonymous_user: bool) -> StoreResult<cart::Model> {
        customer::Entity::find_by_id(owner_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("customer", owner_id))?;

        let cart = cart::ActiveModel {
            owner_id: Set(owner_id),
            total_products: Set(0),
            final_price: Set(Decimal::ZERO),
            in_order: Set(false),
            for_anonymous_user: Set(for_anonymous_user),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(cart_id = cart.id, owner_id, "cart created");
        Ok(cart)
    }

    pub async fn get(&self, id: i32) -> StoreResult<cart::Model> {
        load_cart(self.db.as_ref(), id).await
    }

    pub async fn list_for_customer(&self, owner_id: i32) -> StoreResult<Vec<cart::Model>> {
        Ok(cart::Entity::find()
            .filter(cart::Column::OwnerId.eq(owner_id))
            .order_by_asc(cart::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// The customer's most recent cart that has not been turned into an order.
    pub async fn open_cart_for(&self, owner_id: i32) -> StoreResult<Option<cart::Model>> {
        Ok(cart::Entity::find()
            .filter(cart::Column::OwnerId.eq(owner_id))
            .filter(cart::Column::InOrder.eq(false))
            .order_by_desc(cart::Column::Id)
            .one(self.db.as_ref())
            .await?)
    }

    pub async fn open_or_create(&self, owner_id: i32) -> StoreResult<cart::Model> {
        match self.open_cart_for(owner_id).await? {
            Some(cart) => Ok(cart),
            None => self.create(owner_id, false).await,
        }
    }

    pub async fn lines(&self, cart_id: i32) -> StoreResult<Vec<cart_product::Model>> {
        load_cart(self.db.as_ref(), cart_id).await?;
        Ok(cart_product::Entity::find()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .order_by_asc(cart_product::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lines paired with the items they point at.
    pub async fn lines_with_items(
        &self,
        cart_id: i32,
    ) -> StoreResult<Vec<(cart_product::Model, Purchasable)>> {
        let lines = self.lines(cart_id).await?;
        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            let item = Purchasable::resolve(self.db.as_ref(), line.content_kind, line.object_id)
                .await?;
            resolved.push((line, item));
        }
        Ok(resolved)
    }

    /// Puts `quantity` more of `item` in the cart. An item already in the
    /// cart has its line grown instead of getting a second one.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        cart_id: i32,
        item: ItemRef,
        quantity: i32,
    ) -> StoreResult<cart_product::Model> {
        if quantity < 1 {
            return Err(StoreError::InvalidQuantity(quantity));
        }

        let txn = self.db.begin().await?;
        let cart = load_open_cart(&txn, cart_id).await?;
        let resolved = item.resolve(&txn).await?;

        let existing = cart_product::Entity::find()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .filter(cart_product::Column::ContentKind.eq(item.kind))
            .filter(cart_product::Column::ObjectId.eq(item.id))
            .one(&txn)
            .await?;

        let line = match existing {
            Some(line) => {
                let merged = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(StoreError::InvalidQuantity(quantity))?;
                save_line(&txn, Some(line.id), &cart, &resolved, merged).await?
            }
            None => save_line(&txn, None, &cart, &resolved, quantity).await?,
        };
        txn.commit().await?;

        info!(cart_id, line_id = line.id, quantity = line.quantity, "item added to cart");
        Ok(line)
    }

    /// Sets a line's quantity; zero removes the line and yields `None`.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        line_id: i32,
        quantity: i32,
    ) -> StoreResult<Option<cart_product::Model>> {
        if quantity < 0 {
            return Err(StoreError::InvalidQuantity(quantity));
        }

        let txn = self.db.begin().await?;
        let line = load_line(&txn, line_id).await?;
        let cart = load_open_cart(&txn, line.cart_id).await?;

        let updated = if quantity == 0 {
            cart_product::Entity::delete_by_id(line_id).exec(&txn).await?;
            recompute_cart_totals(&txn, cart.id).await?;
            None
        } else {
            let item = Purchasable::resolve(&txn, line.content_kind, line.object_id).await?;
            Some(save_line(&txn, Some(line_id), &cart, &item, quantity).await?)
        };
        txn.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove_line(&self, line_id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let line = load_line(&txn, line_id).await?;
        load_open_cart(&txn, line.cart_id).await?;
        cart_product::Entity::delete_by_id(line_id).exec(&txn).await?;
        recompute_cart_totals(&txn, line.cart_id).await?;
        txn.commit().await?;
        info!(line_id, cart_id = line.cart_id, "line removed from cart");
        Ok(())
    }

    /// Re-derives `total_products` and `final_price` from the stored lines.
    pub async fn recompute_totals(&self, cart_id: i32) -> StoreResult<cart::Model> {
        recompute_cart_totals(self.db.as_ref(), cart_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = cart::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("cart", id));
        }
        info!(id, "cart deleted");
        Ok(())
    }
}

/// Direct access to cart lines.
#[derive(Clone)]
pub struct CartProductRepository {
    db: Arc<DatabaseConnection>,
}

impl CartProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a new line in `cart_id` for `item`, priced from the item.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        cart_id: i32,
        item: ItemRef,
        quantity: i32,
    ) -> StoreResult<cart_product::Model> {
        let txn = self.db.begin().await?;
        let cart = load_open_cart(&txn, cart_id).await?;
        let resolved = item.resolve(&txn).await?;
        let line = save_line(&txn, None, &cart, &resolved, quantity).await?;
        txn.commit().await?;
        Ok(line)
    }

    /// Writes `line` back. Quantity and item are taken from it and the
    /// final price is recomputed from the item's current price. The stored
    /// row decides which cart is touched; lines cannot move between carts.
    #[instrument(skip(self))]
    pub async fn save(&self, line: &cart_product::Model) -> StoreResult<cart_product::Model> {
        let txn = self.db.begin().await?;
        let stored = load_line(&txn, line.id).await?;
        if stored.cart_id != line.cart_id {
            warn!(line_id = line.id, cart_id = line.cart_id, "line saved against another cart");
            return Err(StoreError::LineNotInCart {
                line_id: line.id,
                cart_id: line.cart_id,
            });
        }
        let cart = load_open_cart(&txn, stored.cart_id).await?;
        let item = Purchasable::resolve(&txn, line.content_kind, line.object_id).await?;
        let saved = save_line(&txn, Some(line.id), &cart, &item, line.quantity).await?;
        txn.commit().await?;
        Ok(saved)
    }

    pub async fn get(&self, id: i32) -> StoreResult<cart_product::Model> {
        load_line(self.db.as_ref(), id).await
    }

    pub async fn list_for_customer(&self, customer_id: i32) -> StoreResult<Vec<cart_product::Model>> {
        Ok(cart_product::Entity::find()
            .filter(cart_product::Column::CustomerId.eq(customer_id))
            .order_by_asc(cart_product::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn item(&self, line: &cart_product::Model) -> StoreResult<Purchasable> {
        Purchasable::resolve(self.db.as_ref(), line.content_kind, line.object_id).await
    }

    /// `"Product {item} for cart"`.
    pub async fn describe(&self, id: i32) -> StoreResult<String> {
        let line = self.get(id).await?;
        let item = self.item(&line).await?;
        Ok(line.display_with_item(item.display_name()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let line = load_line(&txn, id).await?;
        load_open_cart(&txn, line.cart_id).await?;
        cart_product::Entity::delete_by_id(id).exec(&txn).await?;
        recompute_cart_totals(&txn, line.cart_id).await?;
        txn.commit().await?;
        Ok(())
    }
}
