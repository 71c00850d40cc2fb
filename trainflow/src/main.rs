//! Trainflow server binary.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trainflow::admission::AdmissionRegistry;
use trainflow::config::CoordinatorConfig;
use trainflow::executor::BackgroundExecutor;
use trainflow::pipelines::{standard_registry, PipelineSettings};
use trainflow::platform::PlatformClient;
use trainflow::reporting::{LoggingStatusReporter, StatusReporter};
use trainflow::server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = CoordinatorConfig::from_env().context("loading configuration")?;

    let reporter: Arc<dyn StatusReporter> = Arc::new(LoggingStatusReporter);
    let client = PlatformClient::new(config.platform_base_url.clone());
    let settings = PipelineSettings {
        gcs_bucket: config.gcs_bucket.clone(),
    };
    let registry = Arc::new(standard_registry(&settings, &client, &reporter));

    let executor = BackgroundExecutor::new(AdmissionRegistry::new());
    let state = AppState::new(
        registry,
        executor,
        config.service_secret.as_bytes().to_vec(),
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    info!(port = config.port, "trainflow coordinator listening");

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
