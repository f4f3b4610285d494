use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::entities::artist::Entity as Artist;
use crate::entities::media_type::Entity as MediaType;

/// Text stored when an album is created without a description.
pub const DEFAULT_DESCRIPTION: &str = "Description will be added later";

/// Stock an album starts with when none is given.
pub const DEFAULT_STOCK: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "album")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub artist_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub name: String,
    pub media_type_id: i32,
    #[sea_orm(column_type = "Text")]
    pub song_list: String,
    pub release_date: Date,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(default_value = 1)]
    pub stock: i32,
    #[sea_orm(column_type = "Decimal(Some((9, 2)))")]
    pub price: Decimal,
    #[sea_orm(default_value = false)]
    pub offer_of_the_week: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Artist",
        from = "crate::entities::album::Column::ArtistId",
        to = "crate::entities::artist::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Artist,
    #[sea_orm(
        belongs_to = "MediaType",
        from = "crate::entities::album::Column::MediaTypeId",
        to = "crate::entities::media_type::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    MediaType,
}

impl Related<crate::entities::artist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<crate::entities::media_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MediaType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Lowercase model name, the tag cart lines use to point at albums.
    pub fn ct_model(&self) -> &'static str {
        crate::entities::cart_product::ContentKind::Album.as_str()
    }

    /// `"{id} | {artist} | {name}"`.
    pub fn display_with_artist(&self, artist: &crate::entities::artist::Model) -> String {
        format!("{} | {} | {}", self.id, artist.name, self.name)
    }
}
