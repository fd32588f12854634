// Report selectors and the pure step that lays records out as a table.
//
// Every report becomes a Sheet: a title, column labels, and one row per
// record. Writing the Sheet to a workbook happens in the xlsx adapter.

use crate::modules::evaluations::core::metrics::{Aspect, SurveyMetrics};
use crate::modules::evaluations::core::submission::{EvaluationKind, EvaluationSubmission};
use crate::modules::students::core::company_key::normalize_company_key;
use crate::modules::students::core::student::{StudentData, StudentRecord};
use crate::shared::core::primitives::non_blank;
use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Midterms,
    Finals,
}

/// What the caller asked for, before any records are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Roster,
    Concerns,
    AccessKeys(Term),
    SurveyMetrics(EvaluationKind),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown report: {0}")]
pub struct UnknownReport(pub String);

impl FromStr for ReportKind {
    type Err = UnknownReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roster" => Ok(ReportKind::Roster),
            "concerns" => Ok(ReportKind::Concerns),
            "midterms-keys" => Ok(ReportKind::AccessKeys(Term::Midterms)),
            "finals-keys" => Ok(ReportKind::AccessKeys(Term::Finals)),
            "mentor-midterm-metrics" => Ok(ReportKind::SurveyMetrics(EvaluationKind::MentorMidterm)),
            "mentor-final-metrics" => Ok(ReportKind::SurveyMetrics(EvaluationKind::MentorFinal)),
            "student-midterm-metrics" => Ok(ReportKind::SurveyMetrics(EvaluationKind::StudentMidterm)),
            "student-final-metrics" => Ok(ReportKind::SurveyMetrics(EvaluationKind::StudentFinal)),
            other => Err(UnknownReport(other.to_string())),
        }
    }
}

impl ReportKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            ReportKind::Roster => "roster",
            ReportKind::Concerns => "concerns",
            ReportKind::AccessKeys(Term::Midterms) => "midterms-keys",
            ReportKind::AccessKeys(Term::Finals) => "finals-keys",
            ReportKind::SurveyMetrics(EvaluationKind::MentorMidterm) => "mentor-midterm-metrics",
            ReportKind::SurveyMetrics(EvaluationKind::MentorFinal) => "mentor-final-metrics",
            ReportKind::SurveyMetrics(EvaluationKind::StudentMidterm) => "student-midterm-metrics",
            ReportKind::SurveyMetrics(EvaluationKind::StudentFinal) => "student-final-metrics",
        }
    }
}

/// A report selector together with the records it is built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Roster(Vec<StudentRecord>),
    Concerns(Vec<StudentRecord>),
    AccessKeys {
        term: Term,
        students: Vec<StudentRecord>,
    },
    SurveyMetrics {
        kind: EvaluationKind,
        submissions: Vec<EvaluationSubmission>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub title: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Report {
    pub fn to_sheet(&self) -> Sheet {
        match self {
            Report::Roster(students) => roster(students),
            Report::Concerns(students) => concerns(students),
            Report::AccessKeys { term, students } => access_keys(*term, students),
            Report::SurveyMetrics { kind, submissions } => survey_metrics(*kind, submissions),
        }
    }
}

fn text(value: &str) -> Cell {
    Cell::Text(value.trim().to_string())
}

fn sort_key(value: &str) -> (bool, String) {
    let trimmed = value.trim();
    (trimmed.is_empty(), trimmed.to_lowercase())
}

fn roster(students: &[StudentRecord]) -> Sheet {
    let mut sorted: Vec<&StudentRecord> = students.iter().collect();
    // Grouped by company key, as the company read model is; students without one go last.
    sorted.sort_by_cached_key(|s| {
        let company = normalize_company_key(&s.data.partner_company);
        ((company.is_none(), company), sort_key(&s.data.name))
    });
    Sheet {
        name: "Roster",
        title: "Internship Roster",
        columns: vec!["HTE", "Name", "Program", "Gender", "Duration"],
        rows: sorted
            .into_iter()
            .map(|s| {
                vec![
                    text(&s.data.partner_company),
                    text(&s.data.name),
                    text(&s.data.program),
                    text(&s.data.gender),
                    Cell::Text(format_duration(s.data.start_date, s.data.end_date)),
                ]
            })
            .collect(),
    }
}

fn has_feedback(data: &StudentData) -> bool {
    [&data.concerns, &data.solutions, &data.recommendations]
        .into_iter()
        .any(|field| non_blank(field).is_some())
}

fn concerns(students: &[StudentRecord]) -> Sheet {
    let mut sorted: Vec<&StudentRecord> = students.iter().filter(|s| has_feedback(&s.data)).collect();
    sorted.sort_by_cached_key(|s| (sort_key(&s.data.section), sort_key(&s.data.name)));
    Sheet {
        name: "Concerns",
        title: "Student Concerns and Solutions",
        columns: vec!["Name", "Section", "HTE", "Concerns", "Solutions", "Recommendations"],
        rows: sorted
            .into_iter()
            .map(|s| {
                vec![
                    text(&s.data.name),
                    text(&s.data.section),
                    text(&s.data.partner_company),
                    text(&s.data.concerns),
                    text(&s.data.solutions),
                    text(&s.data.recommendations),
                ]
            })
            .collect(),
    }
}

fn access_keys(term: Term, students: &[StudentRecord]) -> Sheet {
    let mut sorted: Vec<&StudentRecord> = students.iter().collect();
    sorted.sort_by_cached_key(|s| (sort_key(&s.data.section), sort_key(&s.data.name)));
    let (name, title) = match term {
        Term::Midterms => ("Midterm Keys", "Midterm Survey Access Keys"),
        Term::Finals => ("Final Keys", "Final Survey Access Keys"),
    };
    Sheet {
        name,
        title,
        columns: vec!["Name", "Section", "Program", "Email", "Access Key"],
        rows: sorted
            .into_iter()
            .map(|s| {
                let key = match term {
                    Term::Midterms => &s.data.midterms_key,
                    Term::Finals => &s.data.finals_key,
                };
                vec![
                    text(&s.data.name),
                    text(&s.data.section),
                    text(&s.data.program),
                    text(&s.data.email),
                    text(key),
                ]
            })
            .collect(),
    }
}

fn survey_metrics(kind: EvaluationKind, submissions: &[EvaluationSubmission]) -> Sheet {
    let (name, title) = match kind {
        EvaluationKind::MentorMidterm => ("Mentor Midterm", "Mentor Midterm Evaluation Metrics"),
        EvaluationKind::MentorFinal => ("Mentor Final", "Mentor Final Evaluation Metrics"),
        EvaluationKind::StudentMidterm => ("Student Midterm", "Student Midterm Evaluation Metrics"),
        EvaluationKind::StudentFinal => ("Student Final", "Student Final Evaluation Metrics"),
    };
    let mut columns = vec!["Student"];
    columns.extend(Aspect::ALL.iter().map(|aspect| aspect.label()));
    columns.extend(["Work Attitude", "Work Performance", "Overall"]);

    let mut submitted: Vec<&EvaluationSubmission> =
        submissions.iter().filter(|s| s.is_submitted()).collect();
    submitted.sort_by_cached_key(|s| sort_key(&s.student_name));
    let rows = submitted
        .into_iter()
        .map(|submission| {
            let metrics = SurveyMetrics::extract(&submission.answers);
            let mut row = vec![text(&submission.student_name)];
            row.extend(Aspect::ALL.iter().map(|aspect| Cell::Number(metrics.rating(*aspect))));
            row.extend([
                Cell::Number(metrics.work_attitude()),
                Cell::Number(metrics.work_performance()),
                Cell::Number(metrics.overall()),
            ]);
            row
        })
        .collect();

    Sheet {
        name,
        title,
        columns,
        rows,
    }
}

/// "Jan 13, 2025 - May 16, 2025". One side alone when only one date is set.
pub fn format_duration(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let show = |date: NaiveDate| date.format("%b %-d, %Y").to_string();
    match (start, end) {
        (Some(start), Some(end)) => format!("{} - {}", show(start), show(end)),
        (Some(date), None) | (None, Some(date)) => show(date),
        (None, None) => String::new(),
    }
}
