// Feeds live collection snapshots into the evaluation status store.
//
// Responsibilities
// - Subscribe to the student collection and the four survey collections.
// - Turn every pushed snapshot into a ReconcilerAction and dispatch it.
// - Stop following on the first subscription failure and wait for an explicit
//   retry before subscribing again. No automatic retry.

use crate::modules::evaluations::adapters::outbound::status_store::EvaluationStatusStore;
use crate::modules::evaluations::core::reduce::ReconcilerAction;
use crate::modules::evaluations::core::submission::{EvaluationKind, EvaluationSubmission};
use crate::modules::students::core::student::{STUDENTS_COLLECTION, StudentRecord};
use crate::shared::infrastructure::record_store::{RecordStore, Snapshot, decode_or_skip};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Students,
    Evaluations(EvaluationKind),
}

impl Source {
    pub fn collection(self) -> &'static str {
        match self {
            Source::Students => STUDENTS_COLLECTION,
            Source::Evaluations(kind) => kind.collection(),
        }
    }
}

/// Documents that fail to decode are skipped with a warning rather than
/// failing the whole snapshot.
pub fn action_for(source: Source, snapshot: Snapshot) -> ReconcilerAction {
    let collection = source.collection();
    let documents = match snapshot {
        Ok(documents) => documents,
        Err(error) => {
            return ReconcilerAction::SubscriptionFailed {
                source: collection.to_string(),
                reason: error.to_string(),
            };
        }
    };
    match source {
        Source::Students => ReconcilerAction::StudentsLoaded(
            documents
                .into_iter()
                .filter_map(|d| decode_or_skip::<StudentRecord>(collection, &d.id, d.data))
                .collect(),
        ),
        Source::Evaluations(kind) => ReconcilerAction::SubmissionsLoaded {
            kind,
            submissions: documents
                .into_iter()
                .filter_map(|d| {
                    let mut submission =
                        decode_or_skip::<EvaluationSubmission>(collection, &d.id, d.data)?;
                    submission.id = d.id;
                    Some(submission)
                })
                .collect(),
        },
    }
}

enum Halt {
    Shutdown,
    Failed,
}

pub struct ReconcileEvaluationsHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
    status: Arc<EvaluationStatusStore>,
}

impl<TStore> ReconcileEvaluationsHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>, status: Arc<EvaluationStatusStore>) -> Self {
        Self { store, status }
    }

    /// Runs until `shutdown` changes or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut status = self.status.subscribe();
        loop {
            match self.follow(&mut shutdown).await {
                Halt::Shutdown => return,
                Halt::Failed => {
                    tracing::info!("evaluation reconciliation waiting for retry");
                    // The failure is already recorded; only a retry clears it.
                    let retried = tokio::select! {
                        retried = async {
                            status.wait_for(|s| s.error.is_none()).await.is_ok()
                        } => retried,
                        _ = shutdown.changed() => false,
                    };
                    if !retried {
                        return;
                    }
                }
            }
        }
    }

    async fn follow(&self, shutdown: &mut watch::Receiver<bool>) -> Halt {
        let mut students = self.store.watch(STUDENTS_COLLECTION).await;
        let mut mentor_midterm = self.store.watch(EvaluationKind::MentorMidterm.collection()).await;
        let mut mentor_final = self.store.watch(EvaluationKind::MentorFinal.collection()).await;
        let mut student_midterm = self.store.watch(EvaluationKind::StudentMidterm.collection()).await;
        let mut student_final = self.store.watch(EvaluationKind::StudentFinal.collection()).await;
        tracing::info!("following student and evaluation collections");

        let initial = [
            (Source::Students, students.borrow_and_update().clone()),
            (
                Source::Evaluations(EvaluationKind::MentorMidterm),
                mentor_midterm.borrow_and_update().clone(),
            ),
            (
                Source::Evaluations(EvaluationKind::MentorFinal),
                mentor_final.borrow_and_update().clone(),
            ),
            (
                Source::Evaluations(EvaluationKind::StudentMidterm),
                student_midterm.borrow_and_update().clone(),
            ),
            (
                Source::Evaluations(EvaluationKind::StudentFinal),
                student_final.borrow_and_update().clone(),
            ),
        ];
        for (source, snapshot) in initial {
            if !self.apply(source, snapshot) {
                return Halt::Failed;
            }
        }

        loop {
            let (source, changed) = tokio::select! {
                changed = students.changed() => (Source::Students, changed),
                changed = mentor_midterm.changed() => (Source::Evaluations(EvaluationKind::MentorMidterm), changed),
                changed = mentor_final.changed() => (Source::Evaluations(EvaluationKind::MentorFinal), changed),
                changed = student_midterm.changed() => (Source::Evaluations(EvaluationKind::StudentMidterm), changed),
                changed = student_final.changed() => (Source::Evaluations(EvaluationKind::StudentFinal), changed),
                _ = shutdown.changed() => return Halt::Shutdown,
            };
            if changed.is_err() {
                self.status.dispatch(ReconcilerAction::SubscriptionFailed {
                    source: source.collection().to_string(),
                    reason: "subscription closed".to_string(),
                });
                return Halt::Failed;
            }
            let snapshot = match source {
                Source::Students => students.borrow_and_update().clone(),
                Source::Evaluations(EvaluationKind::MentorMidterm) => {
                    mentor_midterm.borrow_and_update().clone()
                }
                Source::Evaluations(EvaluationKind::MentorFinal) => {
                    mentor_final.borrow_and_update().clone()
                }
                Source::Evaluations(EvaluationKind::StudentMidterm) => {
                    student_midterm.borrow_and_update().clone()
                }
                Source::Evaluations(EvaluationKind::StudentFinal) => {
                    student_final.borrow_and_update().clone()
                }
            };
            if !self.apply(source, snapshot) {
                return Halt::Failed;
            }
        }
    }

    /// Dispatches the action for one snapshot. Returns false when it was a failure.
    fn apply(&self, source: Source, snapshot: Snapshot) -> bool {
        let action = action_for(source, snapshot);
        let failed = matches!(action, ReconcilerAction::SubscriptionFailed { .. });
        tracing::debug!(collection = source.collection(), failed, "snapshot received");
        self.status.dispatch(action);
        !failed
    }
}
