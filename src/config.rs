use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_LOG_FILTER: &str = "info,musicshop=debug";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_filter: String,
    pub seed_demo_data: bool,
    pub max_connections: u32,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let log_filter = env::var("LOG_FILTER").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse::<u32>().map_err(|err| {
                anyhow::anyhow!("DB_MAX_CONNECTIONS must be a positive integer: {err}")
            })?,
            Err(_) => 1,
        };
        anyhow::ensure!(max_connections > 0, "DB_MAX_CONNECTIONS must be at least 1");

        Ok(Self {
            database_url,
            log_filter,
            seed_demo_data,
            max_connections,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed_demo_data: false,
            max_connections: 1,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
