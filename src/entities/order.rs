use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Alias, ArrayType, Nullable, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, TryGetError, TryGetable};
use serde::Serialize;
use std::str::FromStr;

use crate::entities::cart::Entity as Cart;
use crate::entities::customer::Entity as Customer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub customer_id: i32,
    #[sea_orm(nullable)]
    pub cart_id: Option<i32>,
    pub status: Status,
    pub buying_type: BuyingType,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub final_price: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
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
        on_delete = "SetNull"
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

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(
    enum_name = "order_status_enum",
    db_type = "String(StringLen::N(32))",
    rs_type = "String"
)]
pub enum Status {
    #[sea_orm(string_value = "new")]
    #[serde(rename = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    #[serde(rename = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "is_ready")]
    #[serde(rename = "is_ready")]
    Ready,
    #[sea_orm(string_value = "completed")]
    #[serde(rename = "completed")]
    Completed,
}

impl Status {
    /// The status an order moves to from this one, `None` once completed.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::InProgress),
            Self::InProgress => Some(Self::Ready),
            Self::Ready => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Ready => "is_ready",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "is_ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted as `self` / `delivery`. `DeriveActiveEnum` builds identifiers
/// from the string values and `self` is a keyword, so the column mapping is
/// written out below.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyingType {
    /// Customer picks the order up in the store.
    #[serde(rename = "self")]
    SelfPickup,
    Delivery,
}

impl ActiveEnum for BuyingType {
    type Value = String;

    type ValueVec = Vec<String>;

    fn name() -> DynIden {
        SeaRc::new(Alias::new("buying_type_enum"))
    }

    fn to_value(&self) -> String {
        self.as_str().to_owned()
    }

    fn try_from_value(v: &String) -> Result<Self, DbErr> {
        v.parse().map_err(DbErr::Type)
    }

    fn db_type() -> ColumnDef {
        ColumnType::String(StringLen::N(32)).def()
    }
}

impl From<BuyingType> for Value {
    fn from(buying_type: BuyingType) -> Self {
        buying_type.to_value().into()
    }
}

impl TryGetable for BuyingType {
    fn try_get_by<I: ColIdx>(res: &QueryResult, idx: I) -> Result<Self, TryGetError> {
        let value = String::try_get_by(res, idx)?;
        Self::try_from_value(&value).map_err(TryGetError::DbErr)
    }
}

impl ValueType for BuyingType {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        let value = <String as ValueType>::try_from(v)?;
        Self::try_from_value(&value).map_err(|_| ValueTypeErr)
    }

    fn type_name() -> String {
        <String as ValueType>::type_name()
    }

    fn array_type() -> ArrayType {
        <String as ValueType>::array_type()
    }

    fn column_type() -> ColumnType {
        Self::db_type().get_column_type().to_owned()
    }

    fn enum_type_name() -> Option<&'static str> {
        Some("BuyingType")
    }
}

impl Nullable for BuyingType {
    fn null() -> Value {
        <String as Nullable>::null()
    }
}

impl BuyingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfPickup => "self",
            Self::Delivery => "delivery",
        }
    }
}

impl FromStr for BuyingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::SelfPickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(format!("Invalid buying type: {}", s)),
        }
    }
}

impl std::fmt::Display for BuyingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn status_walks_forward_one_step_at_a_time() {
        assert_eq!(Status::New.next(), Some(Status::InProgress));
        assert_eq!(Status::InProgress.next(), Some(Status::Ready));
        assert_eq!(Status::Ready.next(), Some(Status::Completed));
        assert_eq!(Status::Completed.next(), None);
    }

    #[test]
    fn persisted_values_parse_back() {
        for status in Status::iter() {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!("self".parse::<BuyingType>(), Ok(BuyingType::SelfPickup));
        assert!("ready".parse::<Status>().is_err());
    }

    #[test]
    fn buying_type_column_values() {
        assert_eq!(BuyingType::SelfPickup.to_value(), "self");
        assert_eq!(BuyingType::Delivery.to_value(), "delivery");
        for buying_type in BuyingType::iter() {
            assert_eq!(
                BuyingType::try_from_value(&buying_type.to_value()).unwrap(),
                buying_type
            );
        }
        assert!(BuyingType::try_from_value(&"courier".to_owned()).is_err());
    }
}
