use std::sync::Arc;

use hotelier_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hotelier_observability::init();

    let config = ApiConfig::from_env()?;
    let services = hotelier_api::app::services::build_services(&config).await?;
    let app = hotelier_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
