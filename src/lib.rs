pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod report;
pub mod repository;
pub mod validation;

pub use error::{StoreError, StoreResult};
pub use repository::Store;
