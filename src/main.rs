use musicshop::{config::AppConfig, entities::seed_demo_catalog, report::CatalogSummary, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    musicshop::logging::init(&config.log_filter)?;

    let store = Store::open(&config).await?;

    if config.seed_demo_data {
        if store.genres.list().await?.is_empty() {
            seed_demo_catalog(store.connection()).await?;
        } else {
            tracing::info!("catalog already populated, skipping demo seed");
        }
    }

    let summary = CatalogSummary::collect(&store).await?;
    tracing::info!(summary = %serde_json::to_string(&summary)?, "catalog summary");

    Ok(())
}
