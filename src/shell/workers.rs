// Background tasks started next to the HTTP server.
//
// - Evaluation reconciler: follows the live collections until shutdown.
// - Projection repair: rebuilds section and company entries on a fixed interval.

use crate::modules::evaluations::use_cases::reconcile_evaluations::handler::ReconcileEvaluationsHandler;
use crate::modules::students::use_cases::repair_projections::handler::RepairProjectionsHandler;
use crate::shared::core::primitives::{Actor, now_millis};
use crate::shared::infrastructure::record_store::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const REPAIR_ACTOR_ID: &str = "system:repair";

pub fn spawn_reconciler<TStore>(
    handler: ReconcileEvaluationsHandler<TStore>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    TStore: RecordStore + 'static,
{
    tokio::spawn(async move { handler.run(shutdown).await })
}

/// The first pass runs one full interval after start.
pub fn spawn_repair_worker<TStore>(
    handler: Arc<RepairProjectionsHandler<TStore>>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    TStore: RecordStore + 'static,
{
    tokio::spawn(async move {
        let actor = Actor::new(REPAIR_ACTOR_ID, "Projection repair");
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(error) = handler.handle(&actor, now_millis()).await {
                        tracing::warn!(%error, "projection repair pass failed");
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("projection repair worker stopped");
                    return;
                }
            }
        }
    })
}
