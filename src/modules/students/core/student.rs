// StudentRecord is the source of truth for every derived section and company entry.
//
// Shape
// - StudentData holds the fields an instructor edits through the student form.
// - StudentRecord adds the generated id and audit fields.
// - Documents are stored with camelCase field names.

use crate::shared::core::primitives::{EpochMillis, non_blank};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const STUDENTS_COLLECTION: &str = "students";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentData {
    pub name: String,
    pub gender: String,
    pub program: String,
    pub semester: String,
    pub school_year: String,
    pub partner_company: String,
    pub section: String,
    pub college: String,
    pub location: String,
    pub contact_person: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    pub concerns: String,
    pub solutions: String,
    pub recommendations: String,
    pub evaluation: String,
    pub midterms_key: String,
    pub finals_key: String,
    pub email: String,
    pub internship_email: String,
}

impl StudentData {
    /// Section the student is filed under, if any.
    pub fn section_name(&self) -> Option<&str> {
        non_blank(&self.section)
    }

    pub fn company_name(&self) -> Option<&str> {
        non_blank(&self.partner_company)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    #[serde(flatten)]
    pub data: StudentData,
    pub created_at: EpochMillis,
    pub created_by: String,
    pub updated_at: EpochMillis,
    pub updated_by: String,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().and_then(non_blank) {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
