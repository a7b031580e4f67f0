use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ytdl_backend::downloader::Workspace;
use ytdl_backend::{build_app, AppState, ServerConfig};

/// Initialise tracing from RUST_LOG, defaulting to info.
fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_telemetry();

    let config = ServerConfig::from_env();
    let workspace = Workspace::new(config.scratch_dir.clone())?;
    info!(scratch_dir = %config.scratch_dir.display(), "workspace ready");

    let app = build_app(AppState::new(workspace));
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}
