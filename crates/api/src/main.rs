use std::sync::Arc;

use devforum_api::app::services::{self, ApiConfig};
use devforum_api::auth::{DevTokenVerifier, TokenVerifier};
use devforum_infra::SweepWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    devforum_observability::init();

    let config = ApiConfig::from_env();
    let app_services = Arc::new(services::build_services(&config));

    // Hourly by default; reclaims expired lock records in bounded pages.
    let _sweep_worker = SweepWorker::spawn(
        "lock-sweeper",
        app_services.lock_sweeper(),
        app_services.sweep_interval(),
    );

    let verifier: Arc<dyn TokenVerifier> = Arc::new(DevTokenVerifier::new());
    let app = devforum_api::app::build_app(Arc::clone(&app_services), verifier);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
