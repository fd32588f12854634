// Shared test fixture for student form input and stored student records.
// Compiled into the crate only during tests (cfg(test) in src/lib.rs).

use crate::modules::students::core::student::{StudentData, StudentRecord};
use chrono::NaiveDate;
use std::fs;

pub const FIXED_STUDENT_ID: &str = "student-fixed-0001";
pub const FIXED_INSTRUCTOR_ID: &str = "instructor-fixed-0001";
pub const FIXED_CREATED_AT: i64 = 1_700_000_000_000;

pub struct StudentDataBuilder {
    inner: StudentData,
}

impl Default for StudentDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StudentDataBuilder {
    pub fn new() -> Self {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/src/tests/fixtures/json/student.json");
        let json_str = fs::read_to_string(path).unwrap();
        Self {
            inner: serde_json::from_str(&json_str).unwrap(),
        }
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.inner.name = v.into();
        self
    }

    pub fn gender(mut self, v: impl Into<String>) -> Self {
        self.inner.gender = v.into();
        self
    }

    pub fn program(mut self, v: impl Into<String>) -> Self {
        self.inner.program = v.into();
        self
    }

    pub fn section(mut self, v: impl Into<String>) -> Self {
        self.inner.section = v.into();
        self
    }

    pub fn partner_company(mut self, v: impl Into<String>) -> Self {
        self.inner.partner_company = v.into();
        self
    }

    pub fn college(mut self, v: impl Into<String>) -> Self {
        self.inner.college = v.into();
        self
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.inner.email = v.into();
        self
    }

    pub fn internship_email(mut self, v: impl Into<String>) -> Self {
        self.inner.internship_email = v.into();
        self
    }

    pub fn concerns(mut self, v: impl Into<String>) -> Self {
        self.inner.concerns = v.into();
        self
    }

    pub fn solutions(mut self, v: impl Into<String>) -> Self {
        self.inner.solutions = v.into();
        self
    }

    pub fn midterms_key(mut self, v: impl Into<String>) -> Self {
        self.inner.midterms_key = v.into();
        self
    }

    pub fn finals_key(mut self, v: impl Into<String>) -> Self {
        self.inner.finals_key = v.into();
        self
    }

    pub fn start_date(mut self, v: Option<NaiveDate>) -> Self {
        self.inner.start_date = v;
        self
    }

    pub fn end_date(mut self, v: Option<NaiveDate>) -> Self {
        self.inner.end_date = v;
        self
    }

    pub fn build(self) -> StudentData {
        self.inner
    }

    pub fn record(self, id: impl Into<String>) -> StudentRecord {
        StudentRecord {
            id: id.into(),
            data: self.inner,
            created_at: FIXED_CREATED_AT,
            created_by: FIXED_INSTRUCTOR_ID.to_string(),
            updated_at: FIXED_CREATED_AT,
            updated_by: FIXED_INSTRUCTOR_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod student_data_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_new_and_parses_json() {
        let built = StudentDataBuilder::default().build();
        assert_eq!(built.name, "Juan Dela Cruz");
        assert_eq!(built.section, "BSIT-4A");
        assert_eq!(built.partner_company, "Acme Corp");
        assert_eq!(built.start_date, NaiveDate::from_ymd_opt(2025, 1, 13));
    }

    #[rstest]
    fn record_wraps_the_data_with_fixed_audit_fields() {
        let record = StudentDataBuilder::new().section("S9").record("s-9");
        assert_eq!(record.id, "s-9");
        assert_eq!(record.data.section, "S9");
        assert_eq!(record.created_by, FIXED_INSTRUCTOR_ID);
        assert_eq!(record.updated_at, FIXED_CREATED_AT);
    }
}
