use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::AppConfig;

/// An in-memory database lives only as long as its last connection, so that
/// connection is kept out of the pool's idle and lifetime reaping.
const IN_MEMORY_KEEPALIVE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Pool size for `config`; in-memory databases get exactly one connection.
fn pool_size(config: &AppConfig) -> u32 {
    if is_in_memory(&config.database_url) {
        1
    } else {
        config.max_connections
    }
}

/// Opens the connection pool described by `config`.
pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let max_connections = pool_size(config);
    if max_connections < config.max_connections {
        warn!(
            requested = config.max_connections,
            "in-memory database uses a single connection"
        );
    }

    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);
    if is_in_memory(&config.database_url) {
        options
            .idle_timeout(IN_MEMORY_KEEPALIVE)
            .max_lifetime(IN_MEMORY_KEEPALIVE);
    }

    let db = Database::connect(options).await?;
    info!(url = %config.database_url, max_connections, "connected to database");
    Ok(db)
}
