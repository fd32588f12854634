// Shared test fixture for evaluation survey submissions.

use crate::modules::evaluations::core::submission::{EvaluationSubmission, SubmissionTimestamp};
use serde_json::Value;
use std::fs;

pub const FIXED_EVALUATION_ID: &str = "evaluation-fixed-0001";

pub struct EvaluationSubmissionBuilder {
    inner: EvaluationSubmission,
}

impl Default for EvaluationSubmissionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl EvaluationSubmissionBuilder {
    pub fn new() -> Self {
        let path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/src/tests/fixtures/json/mentor_evaluation.json"
        );
        let json_str = fs::read_to_string(path).unwrap();
        let mut inner: EvaluationSubmission = serde_json::from_str(&json_str).unwrap();
        inner.id = FIXED_EVALUATION_ID.to_string();
        Self { inner }
    }

    /// A submission that carries nothing but a name and a rating bag.
    pub fn anonymous() -> Self {
        Self::new()
            .student_id(None)
            .student_email("")
            .internship_email("")
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn student_id(mut self, v: Option<&str>) -> Self {
        self.inner.student_id = v.map(str::to_string);
        self
    }

    pub fn student_name(mut self, v: impl Into<String>) -> Self {
        self.inner.student_name = v.into();
        self
    }

    pub fn student_email(mut self, v: impl Into<String>) -> Self {
        self.inner.student_email = v.into();
        self
    }

    pub fn internship_email(mut self, v: impl Into<String>) -> Self {
        self.inner.internship_email = v.into();
        self
    }

    pub fn status(mut self, v: impl Into<String>) -> Self {
        self.inner.status = v.into();
        self
    }

    pub fn submitted_at(mut self, v: Option<SubmissionTimestamp>) -> Self {
        self.inner.submitted_at = v;
        self
    }

    pub fn answers(mut self, v: Value) -> Self {
        self.inner.answers = match v {
            Value::Object(map) => map,
            _ => panic!("answers must be a JSON object"),
        };
        self
    }

    pub fn build(self) -> EvaluationSubmission {
        self.inner
    }
}

#[cfg(test)]
mod evaluation_fixture_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_load_the_submitted_mentor_evaluation() {
        let submission = EvaluationSubmissionBuilder::new().build();
        assert_eq!(submission.id, FIXED_EVALUATION_ID);
        assert_eq!(submission.student_id.as_deref(), Some("student-fixed-0001"));
        assert!(submission.is_submitted());
        assert!(submission.submitted_at().is_some());
    }

    #[rstest]
    fn it_should_strip_strong_identifiers_for_anonymous_submissions() {
        let submission = EvaluationSubmissionBuilder::anonymous().build();
        assert_eq!(submission.student_id, None);
        assert!(submission.student_email.is_empty());
        assert_eq!(submission.student_name, "Juan Dela Cruz");
    }
}
