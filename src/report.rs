use serde::Serialize;

use crate::error::StoreResult;
use crate::repository::Store;

/// Counts and highlights of the catalog, logged by the binary at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub media_types: usize,
    pub genres: usize,
    pub members: usize,
    pub artists: usize,
    pub albums: usize,
    pub customers: usize,
    pub offers_of_the_week: Vec<String>,
}

impl CatalogSummary {
    pub async fn collect(store: &Store) -> StoreResult<Self> {
        let mut offers = Vec::new();
        for album in store.albums.offers_of_the_week().await? {
            offers.push(store.albums.describe(album.id).await?);
        }

        Ok(Self {
            media_types: store.media_types.list().await?.len(),
            genres: store.genres.list().await?.len(),
            members: store.members.list().await?.len(),
            artists: store.artists.list().await?.len(),
            albums: store.albums.list().await?.len(),
            customers: store.customers.list().await?.len(),
            offers_of_the_week: offers,
        })
    }
}
