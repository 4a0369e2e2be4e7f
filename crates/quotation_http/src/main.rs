#![forbid(unsafe_code)]

use log::{error, info};
use quotation_core::{init_logging, ConfiguredRepository, QuotationService};
use quotation_http::{build_router, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let repo = ConfiguredRepository::open(&config.storage).map_err(|err| {
        error!(
            "event=server_start module=http status=error backend={} error={err}",
            config.storage.backend_name()
        );
        err
    })?;
    let app = build_router(Arc::new(QuotationService::new(repo)));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=http status=ok bind={} backend={}",
        listener.local_addr()?,
        config.storage.backend_name()
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=http status=error error={err}");
    }
}
