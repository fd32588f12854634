use crate::modules::evaluations::core::matching::{MatchRule, find_match};
use crate::modules::evaluations::core::submission::{EvaluationKind, EvaluationSubmission};
use crate::modules::students::core::student::StudentRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Completion of one survey for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSlot {
    pub submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub evaluation_id: Option<String>,
    pub rule: Option<MatchRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_candidates: Vec<String>,
}

impl EvaluationSlot {
    pub fn resolve(student: &StudentRecord, submissions: &[EvaluationSubmission]) -> Self {
        match find_match(student, submissions) {
            Some(found) => Self {
                submitted: true,
                submitted_at: found.submission.submitted_at(),
                evaluation_id: Some(found.submission.id.clone()),
                rule: Some(found.rule),
                ambiguous_candidates: found.ambiguous_with,
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentEvaluationStatus {
    pub student_id: String,
    pub student_name: String,
    pub mentor_midterm: EvaluationSlot,
    pub mentor_final: EvaluationSlot,
    pub student_midterm: EvaluationSlot,
    pub student_final: EvaluationSlot,
}

impl StudentEvaluationStatus {
    pub fn slot(&self, kind: EvaluationKind) -> &EvaluationSlot {
        match kind {
            EvaluationKind::MentorMidterm => &self.mentor_midterm,
            EvaluationKind::MentorFinal => &self.mentor_final,
            EvaluationKind::StudentMidterm => &self.student_midterm,
            EvaluationKind::StudentFinal => &self.student_final,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        EvaluationKind::ALL
            .iter()
            .any(|kind| !self.slot(*kind).ambiguous_candidates.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilerState {
    /// `None` until the first student snapshot arrives.
    #[serde(skip)]
    pub students: Option<Vec<StudentRecord>>,
    #[serde(skip)]
    pub submissions: BTreeMap<EvaluationKind, Vec<EvaluationSubmission>>,
    pub statuses: Vec<StudentEvaluationStatus>,
    pub error: Option<String>,
    /// Bumped on every retry so subscribers know to resubscribe.
    pub retry_generation: u64,
}

impl ReconcilerState {
    pub fn is_loading(&self) -> bool {
        self.students.is_none()
            || EvaluationKind::ALL
                .iter()
                .any(|kind| !self.submissions.contains_key(kind))
    }
}
