use sea_orm::entity::prelude::*;
use serde::Serialize;
use std::fmt;

/// A musician. Members are shared between artists through `artist_member`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,
    #[sea_orm(indexed)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::entities::artist_member::Entity")]
    ArtistMember,
}

impl Related<crate::entities::artist_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtistMember.def()
    }
}

impl Related<crate::entities::artist::Entity> for Entity {
    fn to() -> RelationDef {
        crate::entities::artist_member::Relation::Artist.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::entities::artist_member::Relation::Member.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
