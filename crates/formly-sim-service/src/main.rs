use clap::Parser;
use formly_metrics::SimulationMetrics;
use formly_sim_core::SimulationService;
use formly_sim_service::{logging, serve, AppState, ServiceConfig};
use tokio::net::TcpListener;
use tracing::{error, info};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "could not listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::parse();
    logging::init(config.log_format)?;

    let metrics = if config.metrics {
        let metrics = SimulationMetrics::new()
            .map_err(|e| anyhow::anyhow!("metrics registry: {e}"))?;
        Some(metrics)
    } else {
        None
    };
    let state = AppState::new(SimulationService::default(), metrics);

    let listener = TcpListener::bind(config.bind_target()).await?;
    info!(
        addr = %listener.local_addr()?,
        strategy = state.service.strategy_name(),
        metrics = config.metrics,
        "formly simulation engine listening"
    );

    serve(listener, state, shutdown_signal()).await?;
    Ok(())
}
