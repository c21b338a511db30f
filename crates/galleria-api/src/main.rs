use std::sync::Arc;

use galleria_api::{build_router, AppState};
use galleria_core::Config;
use galleria_db::{CategoryRepository, GalleryRepository};
use galleria_storage::LocalAssetHost;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    galleria_api::telemetry::init_tracing();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../galleria-db/migrations").run(&pool).await?;

    let assets =
        LocalAssetHost::new(config.asset_store_path.clone(), config.asset_base_url.clone())
            .await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(GalleryRepository::new(pool.clone())),
        Arc::new(CategoryRepository::new(pool)),
        Arc::new(assets),
    ));

    let router = build_router(state);
    galleria_api::server::start_server(&config, router).await?;

    Ok(())
}
