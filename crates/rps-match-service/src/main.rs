//! RPS Match Service binary.

use rps_match_service::config::ServiceConfig;
use rps_match_service::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;

    let state = match &config.state_path {
        Some(path) => {
            info!("Persisting match state to {}", path.display());
            AppState::with_state_file(path)?
        }
        None => {
            info!("Match state kept in memory (set MATCH_STATE_PATH to persist)");
            AppState::new()
        }
    };

    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Match service listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
