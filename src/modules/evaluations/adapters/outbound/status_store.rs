// Holds the live ReconcilerState and pushes every new version to subscribers.
//
// Contract
// - dispatch(action) runs the pure reducer and notifies subscribers once.
// - subscribe() hands out a receiver that starts at the current state.
// - Nothing outside this store mutates the state.

use crate::modules::evaluations::core::reduce::{ReconcilerAction, reduce};
use crate::modules::evaluations::core::state::ReconcilerState;
use std::collections::HashSet;
use tokio::sync::watch;

pub struct EvaluationStatusStore {
    state: watch::Sender<ReconcilerState>,
}

impl Default for EvaluationStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

/// What changed between two states that is worth a warning.
#[derive(Debug, Default, PartialEq)]
struct Notices {
    newly_ambiguous: Vec<(String, String)>,
    new_error: Option<String>,
}

/// The parts of a state that later notices are compared against.
struct Seen {
    ambiguous: HashSet<String>,
    error: Option<String>,
}

impl Seen {
    fn of(state: &ReconcilerState) -> Self {
        Self {
            ambiguous: state
                .statuses
                .iter()
                .filter(|s| s.is_ambiguous())
                .map(|s| s.student_id.clone())
                .collect(),
            error: state.error.clone(),
        }
    }

    fn notices(&self, next: &ReconcilerState) -> Notices {
        Notices {
            newly_ambiguous: next
                .statuses
                .iter()
                .filter(|s| s.is_ambiguous() && !self.ambiguous.contains(&s.student_id))
                .map(|s| (s.student_id.clone(), s.student_name.clone()))
                .collect(),
            new_error: next.error.clone().filter(|_| next.error != self.error),
        }
    }
}

impl EvaluationStatusStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ReconcilerState::default());
        Self { state }
    }

    pub fn dispatch(&self, action: ReconcilerAction) {
        let mut found = Notices::default();
        self.state.send_modify(|state| {
            let seen = Seen::of(state);
            *state = reduce(std::mem::take(state), action);
            found = seen.notices(state);
        });
        for (student_id, student_name) in found.newly_ambiguous {
            tracing::warn!(
                %student_id,
                %student_name,
                "evaluation matched by name against several submissions"
            );
        }
        if let Some(error) = found.new_error {
            tracing::warn!(%error, "evaluation reconciliation halted");
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReconcilerState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ReconcilerState {
        self.state.borrow().clone()
    }
}
