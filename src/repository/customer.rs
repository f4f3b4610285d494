use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument};
use validator::Validate;

use crate::entities::customer;
use crate::error::{StoreError, StoreResult};
use crate::validation::NewCustomer;

#[derive(Clone)]
pub struct CustomerRepository {
    db: Arc<DatabaseConnection>,
}

impl CustomerRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: NewCustomer) -> StoreResult<customer::Model> {
        input.validate()?;
        let model = customer::ActiveModel {
            name: Set(input.name),
            address: Set(input.address),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = model.id, "customer created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<customer::Model> {
        customer::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("customer", id))
    }

    pub async fn list(&self) -> StoreResult<Vec<customer::Model>> {
        Ok(customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: NewCustomer) -> StoreResult<customer::Model> {
        input.validate()?;
        let mut entry: customer::ActiveModel = self.get(id).await?.into();
        entry.name = Set(input.name);
        entry.address = Set(input.address);
        Ok(entry.update(self.db.as_ref()).await?)
    }

    /// Removes the customer with all carts, cart lines and orders.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = customer::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("customer", id));
        }
        info!(id, "customer deleted");
        Ok(())
    }
}
