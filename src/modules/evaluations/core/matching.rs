// Links evaluation submissions to students that may not share a foreign key.
//
// Rules, strongest first
// - StudentId: submission.studentId equals the student id.
// - Email: non-empty student email equals submission.studentEmail.
// - InternshipEmail: non-empty internship email equals submission.internshipEmail.
// - Name: case-insensitive equality or containment in either direction.
//
// Only submissions whose status is "submitted" count. A strong rule beats any
// name match. Several name-only candidates are reported as ambiguous; the
// first one in collection order is still used.

use crate::modules::evaluations::core::submission::EvaluationSubmission;
use crate::modules::students::core::student::StudentRecord;
use crate::shared::core::primitives::non_blank;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchRule {
    StudentId,
    Email,
    InternshipEmail,
    Name,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMatch<'a> {
    pub submission: &'a EvaluationSubmission,
    pub rule: MatchRule,
    /// Ids of every name-only candidate when more than one exists.
    pub ambiguous_with: Vec<String>,
}

/// Strongest rule linking the pair, ignoring submission status.
pub fn match_rule(student: &StudentRecord, submission: &EvaluationSubmission) -> Option<MatchRule> {
    if submission.student_id.as_deref() == Some(student.id.as_str()) {
        return Some(MatchRule::StudentId);
    }
    if non_blank(&student.data.email).is_some() && student.data.email == submission.student_email {
        return Some(MatchRule::Email);
    }
    if non_blank(&student.data.internship_email).is_some()
        && student.data.internship_email == submission.internship_email
    {
        return Some(MatchRule::InternshipEmail);
    }
    if names_match(&student.data.name, &submission.student_name) {
        return Some(MatchRule::Name);
    }
    None
}

fn names_match(student_name: &str, submitted_name: &str) -> bool {
    let (Some(a), Some(b)) = (non_blank(student_name), non_blank(submitted_name)) else {
        return false;
    };
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a == b || a.contains(&b) || b.contains(&a)
}

pub fn find_match<'a>(
    student: &StudentRecord,
    submissions: &'a [EvaluationSubmission],
) -> Option<EvaluationMatch<'a>> {
    let mut strongest: Option<(MatchRule, &'a EvaluationSubmission)> = None;
    let mut by_name: Vec<&'a EvaluationSubmission> = Vec::new();

    for submission in submissions.iter().filter(|s| s.is_submitted()) {
        match match_rule(student, submission) {
            Some(MatchRule::Name) => by_name.push(submission),
            Some(rule) => {
                if strongest.is_none_or(|(best, _)| rule < best) {
                    strongest = Some((rule, submission));
                }
            }
            None => {}
        }
    }

    if let Some((rule, submission)) = strongest {
        return Some(EvaluationMatch {
            submission,
            rule,
            ambiguous_with: Vec::new(),
        });
    }
    let first = *by_name.first()?;
    let ambiguous_with = if by_name.len() > 1 {
        by_name.iter().map(|s| s.id.clone()).collect()
    } else {
        Vec::new()
    };
    Some(EvaluationMatch {
        submission: first,
        rule: MatchRule::Name,
        ambiguous_with,
    })
}
