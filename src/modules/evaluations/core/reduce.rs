use crate::modules::evaluations::core::state::{
    EvaluationSlot, ReconcilerState, StudentEvaluationStatus,
};
use crate::modules::evaluations::core::submission::{EvaluationKind, EvaluationSubmission};
use crate::modules::students::core::student::StudentRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcilerAction {
    StudentsLoaded(Vec<StudentRecord>),
    SubmissionsLoaded {
        kind: EvaluationKind,
        submissions: Vec<EvaluationSubmission>,
    },
    SubscriptionFailed {
        source: String,
        reason: String,
    },
    RetryRequested,
}

/// Every load recomputes all statuses from scratch. A failure keeps the last
/// statuses and records the error until a retry clears it.
pub fn reduce(state: ReconcilerState, action: ReconcilerAction) -> ReconcilerState {
    match action {
        ReconcilerAction::StudentsLoaded(students) => recompute(ReconcilerState {
            students: Some(students),
            ..state
        }),
        ReconcilerAction::SubmissionsLoaded { kind, submissions } => {
            let mut state = state;
            state.submissions.insert(kind, submissions);
            recompute(state)
        }
        ReconcilerAction::SubscriptionFailed { source, reason } => ReconcilerState {
            error: Some(format!("{source}: {reason}")),
            ..state
        },
        ReconcilerAction::RetryRequested => ReconcilerState {
            error: None,
            retry_generation: state.retry_generation + 1,
            ..state
        },
    }
}

fn recompute(state: ReconcilerState) -> ReconcilerState {
    let Some(students) = &state.students else {
        return state;
    };
    let slot = |student: &StudentRecord, kind: EvaluationKind| {
        let submissions = state.submissions.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
        EvaluationSlot::resolve(student, submissions)
    };
    let statuses = students
        .iter()
        .map(|student| StudentEvaluationStatus {
            student_id: student.id.clone(),
            student_name: student.data.name.clone(),
            mentor_midterm: slot(student, EvaluationKind::MentorMidterm),
            mentor_final: slot(student, EvaluationKind::MentorFinal),
            student_midterm: slot(student, EvaluationKind::StudentMidterm),
            student_final: slot(student, EvaluationKind::StudentFinal),
        })
        .collect();
    ReconcilerState { statuses, ..state }
}
