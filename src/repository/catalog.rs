//! Catalog repositories: media types, genres, members, artists, albums.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, instrument};
use validator::Validate;

use crate::entities::{album, artist, artist_member, genre, media_type, member};
use crate::error::{StoreError, StoreResult};
use crate::repository::purge_album_lines;
use crate::validation::{
    ensure_price, ensure_stock, slug_or_default, AlbumChanges, NewAlbum, NewArtist, NewGenre,
    NewMediaType, NewMember,
};

#[derive(Clone)]
pub struct MediaTypeRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaTypeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: NewMediaType) -> StoreResult<media_type::Model> {
        input.validate()?;
        let model = media_type::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = model.id, "media type created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<media_type::Model> {
        media_type::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("media type", id))
    }

    pub async fn list(&self) -> StoreResult<Vec<media_type::Model>> {
        Ok(media_type::Entity::find()
            .order_by_asc(media_type::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: NewMediaType) -> StoreResult<media_type::Model> {
        input.validate()?;
        let mut entry: media_type::ActiveModel = self.get(id).await?.into();
        entry.name = Set(input.name);
        Ok(entry.update(self.db.as_ref()).await?)
    }

    /// Removes the media type and, through the cascade, its albums.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let album_ids: Vec<i32> = album::Entity::find()
            .select_only()
            .column(album::Column::Id)
            .filter(album::Column::MediaTypeId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        purge_album_lines(&txn, &album_ids).await?;

        let result = media_type::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(StoreError::not_found("media type", id));
        }
        txn.commit().await?;
        info!(id, albums = album_ids.len(), "media type deleted");
        Ok(())
    }
}

#[derive(Clone)]
pub struct GenreRepository {
    db: Arc<DatabaseConnection>,
}

impl GenreRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, mut input: NewGenre) -> StoreResult<genre::Model> {
        input.slug = slug_or_default(input.slug, &input.name);
        input.validate()?;
        let model = genre::ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = model.id, slug = %model.slug, "genre created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<genre::Model> {
        genre::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("genre", id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<genre::Model>> {
        Ok(genre::Entity::find()
            .filter(genre::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?)
    }

    pub async fn list(&self) -> StoreResult<Vec<genre::Model>> {
        Ok(genre::Entity::find()
            .order_by_asc(genre::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: NewGenre) -> StoreResult<genre::Model> {
        input.validate()?;
        let mut entry: genre::ActiveModel = self.get(id).await?.into();
        entry.name = Set(input.name);
        entry.slug = Set(input.slug);
        Ok(entry.update(self.db.as_ref()).await?)
    }

    /// Removes the genre together with its artists and their albums.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let album_ids: Vec<i32> = album::Entity::find()
            .select_only()
            .column(album::Column::Id)
            .inner_join(artist::Entity)
            .filter(artist::Column::GenreId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        purge_album_lines(&txn, &album_ids).await?;

        let result = genre::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(StoreError::not_found("genre", id));
        }
        txn.commit().await?;
        info!(id, "genre deleted");
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemberRepository {
    db: Arc<DatabaseConnection>,
}

impl MemberRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, mut input: NewMember) -> StoreResult<member::Model> {
        input.slug = slug_or_default(input.slug, &input.name);
        input.validate()?;
        let model = member::ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = model.id, slug = %model.slug, "member created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<member::Model> {
        member::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("member", id))
    }

    pub async fn list(&self) -> StoreResult<Vec<member::Model>> {
        Ok(member::Entity::find()
            .order_by_asc(member::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: NewMember) -> StoreResult<member::Model> {
        input.validate()?;
        let mut entry: member::ActiveModel = self.get(id).await?.into();
        entry.name = Set(input.name);
        entry.slug = Set(input.slug);
        Ok(entry.update(self.db.as_ref()).await?)
    }

    /// Artists this member plays in.
    pub async fn artists(&self, id: i32) -> StoreResult<Vec<artist::Model>> {
        let member = self.get(id).await?;
        Ok(member
            .find_related(artist::Entity)
            .order_by_asc(artist::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = member::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("member", id));
        }
        info!(id, "member deleted");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ArtistRepository {
    db: Arc<DatabaseConnection>,
}

impl ArtistRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, mut input: NewArtist) -> StoreResult<artist::Model> {
        input.slug = slug_or_default(input.slug, &input.name);
        input.validate()?;
        self.ensure_genre(input.genre_id).await?;
        let model = artist::ActiveModel {
            name: Set(input.name),
            genre_id: Set(input.genre_id),
            slug: Set(input.slug),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = model.id, slug = %model.slug, "artist created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<artist::Model> {
        artist::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("artist", id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<artist::Model>> {
        Ok(artist::Entity::find()
            .filter(artist::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?)
    }

    pub async fn list(&self) -> StoreResult<Vec<artist::Model>> {
        Ok(artist::Entity::find()
            .order_by_asc(artist::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn list_by_genre(&self, genre_id: i32) -> StoreResult<Vec<artist::Model>> {
        Ok(artist::Entity::find()
            .filter(artist::Column::GenreId.eq(genre_id))
            .order_by_asc(artist::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: NewArtist) -> StoreResult<artist::Model> {
        input.validate()?;
        self.ensure_genre(input.genre_id).await?;
        let mut entry: artist::ActiveModel = self.get(id).await?.into();
        entry.name = Set(input.name);
        entry.slug = Set(input.slug);
        entry.genre_id = Set(input.genre_id);
        Ok(entry.update(self.db.as_ref()).await?)
    }

    /// Removes the artist and, through the cascade, its albums.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        let album_ids: Vec<i32> = album::Entity::find()
            .select_only()
            .column(album::Column::Id)
            .filter(album::Column::ArtistId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        purge_album_lines(&txn, &album_ids).await?;

        let result = artist::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(StoreError::not_found("artist", id));
        }
        txn.commit().await?;
        info!(id, albums = album_ids.len(), "artist deleted");
        Ok(())
    }

    /// Links a member to the artist. Linking twice is a no-op.
    #[instrument(skip(self))]
    pub async fn add_member(&self, artist_id: i32, member_id: i32) -> StoreResult<()> {
        self.get(artist_id).await?;
        member::Entity::find_by_id(member_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("member", member_id))?;

        let existing = artist_member::Entity::find_by_id((artist_id, member_id))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        artist_member::Entity::insert(artist_member::ActiveModel {
            artist_id: Set(artist_id),
            member_id: Set(member_id),
        })
        .exec_without_returning(self.db.as_ref())
        .await?;
        info!(artist_id, member_id, "member linked");
        Ok(())
    }

    /// Returns whether a link was removed.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, artist_id: i32, member_id: i32) -> StoreResult<bool> {
        let result = artist_member::Entity::delete_by_id((artist_id, member_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn members(&self, artist_id: i32) -> StoreResult<Vec<member::Model>> {
        let artist = self.get(artist_id).await?;
        Ok(artist
            .find_related(member::Entity)
            .order_by_asc(member::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn genre(&self, artist_id: i32) -> StoreResult<genre::Model> {
        let artist = self.get(artist_id).await?;
        artist
            .find_related(genre::Entity)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("genre", artist.genre_id))
    }

    /// `"{name}|{genre}"`.
    pub async fn describe(&self, artist_id: i32) -> StoreResult<String> {
        let artist = self.get(artist_id).await?;
        let genre = self.genre(artist_id).await?;
        Ok(artist.display_with_genre(&genre))
    }

    async fn ensure_genre(&self, genre_id: i32) -> StoreResult<()> {
        genre::Entity::find_by_id(genre_id)
            .one(self.db.as_ref())
            .await?
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("genre", genre_id))
    }
}

#[derive(Clone)]
pub struct AlbumRepository {
    db: Arc<DatabaseConnection>,
}

impl AlbumRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: NewAlbum) -> StoreResult<album::Model> {
        input.validate()?;
        ensure_price(input.price)?;
        let stock = input.stock.unwrap_or(album::DEFAULT_STOCK);
        ensure_stock(stock)?;
        self.ensure_artist(input.artist_id).await?;
        self.ensure_media_type(input.media_type_id).await?;

        let model = album::ActiveModel {
            artist_id: Set(input.artist_id),
            name: Set(input.name),
            media_type_id: Set(input.media_type_id),
            song_list: Set(input.song_list),
            release_date: Set(input.release_date),
            description: Set(input
                .description
                .unwrap_or_else(|| album::DEFAULT_DESCRIPTION.to_owned())),
            stock: Set(stock),
            price: Set(input.price),
            offer_of_the_week: Set(input.offer_of_the_week),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = model.id, price = %model.price, "album created");
        Ok(model)
    }

    pub async fn get(&self, id: i32) -> StoreResult<album::Model> {
        album::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("album", id))
    }

    pub async fn list(&self) -> StoreResult<Vec<album::Model>> {
        Ok(album::Entity::find()
            .order_by_asc(album::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn list_by_artist(&self, artist_id: i32) -> StoreResult<Vec<album::Model>> {
        Ok(album::Entity::find()
            .filter(album::Column::ArtistId.eq(artist_id))
            .order_by_asc(album::Column::ReleaseDate)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn offers_of_the_week(&self) -> StoreResult<Vec<album::Model>> {
        Ok(album::Entity::find()
            .filter(album::Column::OfferOfTheWeek.eq(true))
            .order_by_asc(album::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, changes: AlbumChanges) -> StoreResult<album::Model> {
        changes.validate()?;
        let mut entry: album::ActiveModel = self.get(id).await?.into();

        if let Some(artist_id) = changes.artist_id {
            self.ensure_artist(artist_id).await?;
            entry.artist_id = Set(artist_id);
        }
        if let Some(media_type_id) = changes.media_type_id {
            self.ensure_media_type(media_type_id).await?;
            entry.media_type_id = Set(media_type_id);
        }
        if let Some(name) = changes.name {
            entry.name = Set(name);
        }
        if let Some(song_list) = changes.song_list {
            entry.song_list = Set(song_list);
        }
        if let Some(release_date) = changes.release_date {
            entry.release_date = Set(release_date);
        }
        if let Some(description) = changes.description {
            entry.description = Set(description);
        }
        if let Some(stock) = changes.stock {
            ensure_stock(stock)?;
            entry.stock = Set(stock);
        }
        if let Some(price) = changes.price {
            ensure_price(price)?;
            entry.price = Set(price);
        }
        if let Some(offer) = changes.offer_of_the_week {
            entry.offer_of_the_week = Set(offer);
        }

        Ok(entry.update(self.db.as_ref()).await?)
    }

    pub async fn set_offer_of_the_week(&self, id: i32, offer: bool) -> StoreResult<album::Model> {
        self.update(
            id,
            AlbumChanges {
                offer_of_the_week: Some(offer),
                ..Default::default()
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> StoreResult<()> {
        let txn = self.db.begin().await?;
        purge_album_lines(&txn, &[id]).await?;
        let result = album::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(StoreError::not_found("album", id));
        }
        txn.commit().await?;
        info!(id, "album deleted");
        Ok(())
    }

    /// `"{id} | {artist} | {name}"`.
    pub async fn describe(&self, id: i32) -> StoreResult<String> {
        let album = self.get(id).await?;
        let artist = album
            .find_related(artist::Entity)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| StoreError::not_found("artist", album.artist_id))?;
        Ok(album.display_with_artist(&artist))
    }

    async fn ensure_artist(&self, artist_id: i32) -> StoreResult<()> {
        artist::Entity::find_by_id(artist_id)
            .one(self.db.as_ref())
            .await?
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("artist", artist_id))
    }

    async fn ensure_media_type(&self, media_type_id: i32) -> StoreResult<()> {
        media_type::Entity::find_by_id(media_type_id)
            .one(self.db.as_ref())
            .await?
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("media type", media_type_id))
    }
}
