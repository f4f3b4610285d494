use sea_orm::entity::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::entities::customer::Entity as Customer;

/// A shopping cart. `total_products` and `final_price` are denormalized
/// sums over the cart's lines and are rewritten by the cart repository
/// whenever a line changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cart")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub owner_id: i32,
    #[sea_orm(default_value = 0)]
    pub total_products: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub final_price: Decimal,
    #[sea_orm(default_value = false)]
    pub in_order: bool,
    #[sea_orm(default_value = false)]
    pub for_anonymous_user: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Customer",
        from = "crate::entities::cart::Column::OwnerId",
        to = "crate::entities::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(has_many = "crate::entities::cart_product::Entity")]
    CartProduct,
}

impl Related<crate::entities::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<crate::entities::cart_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartProduct.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
