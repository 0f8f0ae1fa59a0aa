mod api;
mod middleware;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use weekstats_collectors::Collectors;

use crate::{
    api::{build_app, AppState},
    store::ManualStatsStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(weekstats_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let configured: Vec<&str> = weekstats_core::Platform::ALL
        .into_iter()
        .filter(|p| config.is_configured(*p))
        .map(weekstats_core::Platform::id)
        .collect();
    tracing::info!(platforms = ?configured, "configured platforms");

    let collectors = Arc::new(Collectors::from_config(&config)?);
    let app = build_app(AppState {
        config: Arc::clone(&config),
        collectors,
        manual: ManualStatsStore::new(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
