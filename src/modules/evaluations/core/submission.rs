// Evaluation survey submissions as stored in the four survey collections.
//
// Shape
// - A handful of identity fields the reconciler matches on.
// - Every other field is kept in document order so ratings can be read back
//   by label (see metrics.rs).
// - submittedAt arrives as a native {seconds, nanoseconds} timestamp, epoch
//   milliseconds, or an ISO-8601 / plain date string. Any other shape is kept
//   as-is and reads as no timestamp rather than rejecting the document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvaluationKind {
    MentorMidterm,
    MentorFinal,
    StudentMidterm,
    StudentFinal,
}

impl EvaluationKind {
    pub const ALL: [EvaluationKind; 4] = [
        EvaluationKind::MentorMidterm,
        EvaluationKind::MentorFinal,
        EvaluationKind::StudentMidterm,
        EvaluationKind::StudentFinal,
    ];

    pub fn collection(self) -> &'static str {
        match self {
            EvaluationKind::MentorMidterm => "mentor_midterm_evaluations",
            EvaluationKind::MentorFinal => "mentor_final_evaluations",
            EvaluationKind::StudentMidterm => "student_midterm_evaluations",
            EvaluationKind::StudentFinal => "student_final_evaluations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionTimestamp {
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(Value),
}

impl SubmissionTimestamp {
    /// Plain UTC instant, or `None` when the value cannot be read as one.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            SubmissionTimestamp::Native {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            SubmissionTimestamp::Millis(millis) => DateTime::from_timestamp_millis(*millis),
            SubmissionTimestamp::FractionalMillis(millis) => {
                let whole = millis.round();
                if whole.is_finite() && whole.abs() <= i64::MAX as f64 {
                    DateTime::from_timestamp_millis(whole as i64)
                } else {
                    None
                }
            }
            SubmissionTimestamp::Text(text) => parse_text(text.trim()),
            SubmissionTimestamp::Other(_) => None,
        }
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSubmission {
    /// Document id, filled in from the store rather than the document body.
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub student_email: String,
    #[serde(default)]
    pub internship_email: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub submitted_at: Option<SubmissionTimestamp>,
    /// Remaining survey answers in document order.
    #[serde(flatten)]
    pub answers: Map<String, Value>,
}

impl EvaluationSubmission {
    pub fn is_submitted(&self) -> bool {
        self.status == "submitted"
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at.as_ref().and_then(SubmissionTimestamp::to_datetime)
    }
}
