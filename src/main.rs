use std::net::SocketAddr;

use axum::Router;
use candidate_services::{
    config::{get_config, init_config, LogFormat, ServiceRole},
    database, routes, AttachmentsState, CandidatesState, GatewayState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn build_app() -> anyhow::Result<Router> {
    let config = get_config();
    let cors = config.cors_allowed_origins.as_deref();

    let app = match config.role {
        ServiceRole::Candidates => {
            let repositories = database::open(config).await?;
            routes::candidates_app(CandidatesState::from_config(config, repositories)?, cors)
        }
        ServiceRole::Attachments => {
            let repositories = database::open(config).await?;
            routes::attachments_app(AttachmentsState::from_config(config, repositories)?, cors)
        }
        ServiceRole::Gateway => routes::gateway_app(GatewayState::from_config(config)?, cors),
    };
    Ok(app)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config.log_format);

    let app = build_app().await?;

    let addr: SocketAddr = config.server_address.parse()?;
    info!(role = %config.role, "Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
