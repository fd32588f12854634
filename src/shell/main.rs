use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use internship_tracker::modules::evaluations::adapters::outbound::status_store::EvaluationStatusStore;
use internship_tracker::modules::evaluations::use_cases::reconcile_evaluations::handler::ReconcileEvaluationsHandler;
use internship_tracker::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use internship_tracker::shell::config::Settings;
use internship_tracker::shell::http::router;
use internship_tracker::shell::state::AppState;
use internship_tracker::shell::workers::{spawn_reconciler, spawn_repair_worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().context("invalid configuration")?;

    // In-memory record store for now
    let store = Arc::new(InMemoryRecordStore::new());
    let evaluation_status = Arc::new(EvaluationStatusStore::new());
    let state = AppState::new(
        store.clone(),
        evaluation_status.clone(),
        settings.institution.clone(),
    );

    let (stop, shutdown) = watch::channel(false);
    let mut workers = vec![spawn_reconciler(
        ReconcileEvaluationsHandler::new(store, evaluation_status),
        shutdown.clone(),
    )];
    match settings.repair_interval() {
        Some(every) => workers.push(spawn_repair_worker(
            state.repair_projections.clone(),
            every,
            shutdown,
        )),
        None => tracing::info!("projection repair worker disabled"),
    }

    let listener = tokio::net::TcpListener::bind(&settings.bind_address)
        .await
        .with_context(|| format!("cannot bind {}", settings.bind_address))?;
    tracing::info!("HTTP endpoint: http://{}", settings.bind_address);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    stop.send(true).ok();
    for worker in workers {
        worker.await.ok();
    }
    Ok(())
}
