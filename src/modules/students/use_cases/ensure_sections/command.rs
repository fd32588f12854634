use crate::shared::core::primitives::EpochMillis;
use serde::Deserialize;

/// One section name or a list of them, as instructor profiles store either.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SectionNames {
    One(String),
    Many(Vec<String>),
}

impl SectionNames {
    /// Trimmed, non-blank names in first-seen order without duplicates.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&String> = match self {
            SectionNames::One(name) => vec![name],
            SectionNames::Many(names) => names.iter().collect(),
        };
        let mut out: Vec<String> = Vec::new();
        for name in raw.into_iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !out.iter().any(|seen| seen == name) {
                out.push(name.to_string());
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub college: String,
    pub sections: SectionNames,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureSections {
    pub profile: InstructorProfile,
    pub requested_at: EpochMillis,
}

#[cfg(test)]
mod instructor_profile_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("BSIT-4A"), vec!["BSIT-4A"])]
    #[case(json!(["BSIT-4A", " BSIT-4B ", "", "BSIT-4A"]), vec!["BSIT-4A", "BSIT-4B"])]
    #[case(json!("   "), Vec::<&str>::new())]
    fn it_should_accept_one_or_many_section_names(
        #[case] sections: serde_json::Value,
        #[case] expected: Vec<&str>,
    ) {
        let profile: InstructorProfile = serde_json::from_value(json!({
            "id": "instructor-1",
            "name": "Prof. Reyes",
            "sections": sections,
        }))
        .unwrap();
        assert_eq!(profile.sections.names(), expected);
        assert_eq!(profile.college, "");
    }
}
