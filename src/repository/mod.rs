//! One repository per entity, all sharing a single connection pool.

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;

use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::debug;

use crate::config::AppConfig;
use crate::entities::{cart as cart_entity, cart_product, cart_product::ContentKind, setup_schema};
use crate::error::StoreResult;

pub use cart::{CartProductRepository, CartRepository};
pub use catalog::{
    AlbumRepository, ArtistRepository, GenreRepository, MediaTypeRepository, MemberRepository,
};
pub use customer::CustomerRepository;
pub use order::OrderRepository;

#[derive(Clone)]
pub struct Store {
    db: Arc<DatabaseConnection>,
    pub media_types: MediaTypeRepository,
    pub genres: GenreRepository,
    pub members: MemberRepository,
    pub artists: ArtistRepository,
    pub albums: AlbumRepository,
    pub customers: CustomerRepository,
    pub carts: CartRepository,
    pub cart_products: CartProductRepository,
    pub orders: OrderRepository,
}

impl Store {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            media_types: MediaTypeRepository::new(db.clone()),
            genres: GenreRepository::new(db.clone()),
            members: MemberRepository::new(db.clone()),
            artists: ArtistRepository::new(db.clone()),
            albums: AlbumRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            carts: CartRepository::new(db.clone()),
            cart_products: CartProductRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            db,
        }
    }

    /// Connects using `config` and makes sure the schema exists.
    pub async fn open(config: &AppConfig) -> StoreResult<Self> {
        let db = crate::db::connect(config).await?;
        setup_schema(&db).await?;
        Ok(Self::new(Arc::new(db)))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Deletes open-cart lines that point at any of `album_ids` and refreshes
/// the totals of the carts they belonged to. Lines in carts that already
/// became orders are left alone.
pub(crate) async fn purge_album_lines<C: ConnectionTrait>(
    db: &C,
    album_ids: &[i32],
) -> StoreResult<()> {
    if album_ids.is_empty() {
        return Ok(());
    }

    let lines = cart_product::Entity::find()
        .filter(cart_product::Column::ContentKind.eq(ContentKind::Album))
        .filter(cart_product::Column::ObjectId.is_in(album_ids.iter().copied()))
        .find_also_related(cart_entity::Entity)
        .all(db)
        .await?;

    let mut touched = BTreeSet::new();
    let mut doomed = Vec::new();
    for (line, cart) in lines {
        if cart.is_some_and(|cart| !cart.in_order) {
            touched.insert(line.cart_id);
            doomed.push(line.id);
        }
    }
    if doomed.is_empty() {
        return Ok(());
    }

    let result = cart_product::Entity::delete_many()
        .filter(cart_product::Column::Id.is_in(doomed))
        .exec(db)
        .await?;
    debug!(removed = result.rows_affected, "purged cart lines for deleted albums");

    for cart_id in touched {
        cart::recompute_cart_totals(db, cart_id).await?;
    }
    Ok(())
}
