use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use photovault::config::AppConfig;
use photovault::database;
use photovault::state::AppState;
use photovault::storage::FilesystemMediaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photovault=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;

    let media = FilesystemMediaStore::new(
        PathBuf::from(&config.storage.media_root),
        config.storage.max_photo_size,
    )
    .await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        media: Arc::new(media),
        config,
    };

    let app = photovault::build_router(state);

    info!("PhotoVault listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
