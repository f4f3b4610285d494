use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::genre::Entity as Genre;

/// A performer or band.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "artist")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(125))")]
    pub name: String,
    #[sea_orm(indexed)]
    pub genre_id: i32,
    #[sea_orm(indexed)]
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Genre",
        from = "crate::entities::artist::Column::GenreId",
        to = "crate::entities::genre::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Genre,
    #[sea_orm(has_many = "crate::entities::album::Entity")]
    Album,
    #[sea_orm(has_many = "crate::entities::artist_member::Entity")]
    ArtistMember,
}

impl Related<crate::entities::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl Related<crate::entities::album::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<crate::entities::artist_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtistMember.def()
    }
}

impl Related<crate::entities::member::Entity> for Entity {
    fn to() -> RelationDef {
        crate::entities::artist_member::Relation::Member.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::entities::artist_member::Relation::Artist.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `"{name}|{genre}"`, the form used in admin listings.
    pub fn display_with_genre(&self, genre: &crate::entities::genre::Model) -> String {
        format!("{}|{}", self.name, genre.name)
    }
}
