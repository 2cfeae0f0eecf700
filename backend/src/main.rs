//! Crowd Insights server entry point

use std::{net::SocketAddr, sync::Arc};

use crowd_insights_backend::{
    create_app,
    external::CrowdApiClient,
    services::DashboardController,
    AppState, Config,
};
use shared::Scope;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crowd_insights_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Crowd Insights Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Statistics backend: {}", config.backend.base_url);

    let api = Arc::new(CrowdApiClient::from_config(&config.backend)?);
    let dashboard = DashboardController::spawn(api, &config.forecast, &config.dashboard);

    // Initial load for the unscoped view
    dashboard.select_scope(Scope::All).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        dashboard,
    };

    let app = create_app(state);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
