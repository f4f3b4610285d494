use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::cart::Entity as Cart;
use crate::entities::customer::Entity as Customer;

/// One line of a cart. `content_kind` + `object_id` point at the purchased
/// item; there is no foreign key on that pair since the target table
/// depends on the kind.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cart_product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub customer_id: i32,
    #[sea_orm(indexed)]
    pub cart_id: i32,
    pub content_kind: ContentKind,
    pub object_id: i32,
    #[sea_orm(default_value = 1)]
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub final_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Customer",
        from = "Column::CustomerId",
        to = "crate::entities::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "Cart",
        from = "Column::CartId",
        to = "crate::entities::cart::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Cart,
}

impl Related<crate::entities::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<crate::entities::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Kinds of catalog entries a cart line can reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(
    enum_name = "content_kind_enum",
    db_type = "String(StringLen::N(32))",
    rs_type = "String"
)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[sea_orm(string_value = "album")]
    Album,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "album",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Model {
    /// `"Product {item} for cart"`, given the name of the referenced item.
    pub fn display_with_item(&self, item_name: &str) -> String {
        format!("Product {} for cart", item_name)
    }
}
