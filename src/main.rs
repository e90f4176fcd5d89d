//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use academy_crm_gateway::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Without configuration the gateway must not start.
    let config = Config::from_env()?;
    let addr = config.bind_addr.clone();
    let app_state = AppState::new(config)?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Gateway listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
