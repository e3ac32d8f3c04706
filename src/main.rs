use std::sync::Arc;

use nyumba_api::database::PgStore;
use nyumba_api::storage::ImageStore;
use nyumba_api::{app, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nyumba_api=debug,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("starting Nyumba API in {:?} mode", config.environment);

    let store = PgStore::connect().await?;

    let images = ImageStore::new(&config.uploads.dir);
    images.ensure_dir().await?;

    let state = AppState {
        store: Arc::new(store),
        images,
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);
    let bind_addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
