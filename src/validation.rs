//! Input shapes accepted by the repositories, with their field rules.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::error::{StoreError, StoreResult};

pub static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

/// Lowercases `name` and joins its ASCII alphanumeric runs with `-`.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Fills an empty `slug` from `name`.
pub(crate) fn slug_or_default(slug: String, name: &str) -> String {
    if slug.trim().is_empty() {
        slugify(name)
    } else {
        slug
    }
}

pub(crate) fn ensure_price(price: Decimal) -> StoreResult<()> {
    if price < Decimal::ZERO {
        return Err(StoreError::NegativePrice(price));
    }
    Ok(())
}

pub(crate) fn ensure_stock(stock: i32) -> StoreResult<()> {
    if stock < 0 {
        return Err(StoreError::NegativeStock(stock));
    }
    Ok(())
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewMediaType {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewGenre {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    /// Derived from `name` when left empty.
    #[serde(default)]
    #[validate(regex(path = *SLUG_REGEX))]
    pub slug: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewMember {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Derived from `name` when left empty.
    #[serde(default)]
    #[validate(regex(path = *SLUG_REGEX))]
    pub slug: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewArtist {
    #[validate(length(min = 1, max = 125))]
    pub name: String,
    /// Derived from `name` when left empty.
    #[serde(default)]
    #[validate(regex(path = *SLUG_REGEX))]
    pub slug: String,
    pub genre_id: i32,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewAlbum {
    pub artist_id: i32,
    pub media_type_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub song_list: String,
    pub release_date: NaiveDate,
    /// Falls back to the placeholder description.
    pub description: Option<String>,
    /// Falls back to a stock of one.
    pub stock: Option<i32>,
    pub price: Decimal,
    #[serde(default)]
    pub offer_of_the_week: bool,
}

/// Partial album update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct AlbumChanges {
    pub artist_id: Option<i32>,
    pub media_type_id: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub song_list: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub stock: Option<i32>,
    pub price: Option<Decimal>,
    pub offer_of_the_week: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
}
