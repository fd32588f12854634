use serde::{Deserialize, Serialize};

/// Lines printed above every report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InstitutionMeta {
    pub institution: String,
    pub college: String,
    /// Free text such as "Second Semester, A.Y. 2024-2025".
    pub term: String,
}

impl Default for InstitutionMeta {
    fn default() -> Self {
        Self {
            institution: "University".to_string(),
            college: "College".to_string(),
            term: String::new(),
        }
    }
}
