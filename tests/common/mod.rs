#![allow(dead_code)]

use chrono::NaiveDate;
use musicshop::{
    config::AppConfig,
    entities::{album, artist, customer, genre, media_type},
    validation::{NewAlbum, NewArtist, NewCustomer, NewGenre, NewMediaType},
    Store,
};
use rust_decimal::Decimal;

pub async fn store() -> Store {
    Store::open(&AppConfig::default())
        .await
        .expect("Failed to open in-memory store")
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// SQLite hands decimals back through a float; compare at column scale.
pub fn cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

pub struct Catalog {
    pub media_type: media_type::Model,
    pub genre: genre::Model,
    pub artist: artist::Model,
    pub album: album::Model,
}

pub async fn catalog(store: &Store) -> Catalog {
    let media_type = store
        .media_types
        .create(NewMediaType {
            name: "CD".to_owned(),
        })
        .await
        .expect("Failed to create media type");
    let genre = store
        .genres
        .create(NewGenre {
            name: "Jazz".to_owned(),
            slug: "jazz".to_owned(),
        })
        .await
        .expect("Failed to create genre");
    let artist = store
        .artists
        .create(NewArtist {
            name: "Miles Davis".to_owned(),
            slug: "miles-davis".to_owned(),
            genre_id: genre.id,
        })
        .await
        .expect("Failed to create artist");
    let album = add_album(store, &artist, &media_type, "Kind of Blue", money(1999)).await;

    Catalog {
        media_type,
        genre,
        artist,
        album,
    }
}

pub async fn add_album(
    store: &Store,
    artist: &artist::Model,
    media_type: &media_type::Model,
    name: &str,
    price: Decimal,
) -> album::Model {
    store
        .albums
        .create(NewAlbum {
            artist_id: artist.id,
            media_type_id: media_type.id,
            name: name.to_owned(),
            song_list: "So What\nFreddie Freeloader".to_owned(),
            release_date: NaiveDate::from_ymd_opt(1959, 8, 17).unwrap(),
            description: None,
            stock: None,
            price,
            offer_of_the_week: false,
        })
        .await
        .expect("Failed to create album")
}

pub async fn customer(store: &Store, name: &str) -> customer::Model {
    store
        .customers
        .create(NewCustomer {
            name: name.to_owned(),
            address: Some("1 Record Lane".to_owned()),
        })
        .await
        .expect("Failed to create customer")
}
