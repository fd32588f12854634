// Denormalized read models kept in step with StudentRecord, and the pure
// planning step that turns a student change into read model mutations.
//
// Collections
// - sections/{sectionName}                    SectionRecord
// - sections/{sectionName}/students/{id}      SectionStudentEntry
// - companies/{companyKey}                    CompanyRecord
// - companies/{companyKey}/students/{id}      CompanyStudentEntry
//
// Planning rules
// - Section and company are planned independently.
// - Moved: remove from the old parent, then add under the new one.
// - Not moved: patch the existing entry only when its copied fields differ.

use crate::modules::students::core::company_key::normalize_company_key;
use crate::modules::students::core::student::StudentRecord;
use crate::shared::core::primitives::EpochMillis;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const SECTIONS_COLLECTION: &str = "sections";
pub const COMPANIES_COLLECTION: &str = "companies";

pub fn section_students_collection(section: &str) -> String {
    format!("{SECTIONS_COLLECTION}/{section}/students")
}

pub fn company_students_collection(company_key: &str) -> String {
    format!("{COMPANIES_COLLECTION}/{company_key}/students")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub section_name: String,
    pub college: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub created_at: EpochMillis,
    pub created_by: String,
    pub updated_at: EpochMillis,
    pub updated_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    /// Spelling of the first write that created the record. Never corrected.
    pub company_name: String,
    pub company_key: String,
    pub created_at: EpochMillis,
    pub created_by: String,
    pub updated_at: EpochMillis,
    pub updated_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStudentEntry {
    pub student_id: String,
    pub name: String,
    pub gender: String,
    pub program: String,
    pub partner_company: String,
    pub email: String,
    pub school_year: String,
    pub semester: String,
    pub updated_at: EpochMillis,
}

impl SectionStudentEntry {
    pub fn from_student(student: &StudentRecord) -> Self {
        let data = &student.data;
        Self {
            student_id: student.id.clone(),
            name: data.name.clone(),
            gender: data.gender.clone(),
            program: data.program.clone(),
            partner_company: data.partner_company.clone(),
            email: data.email.clone(),
            school_year: data.school_year.clone(),
            semester: data.semester.clone(),
            updated_at: student.updated_at,
        }
    }

    fn same_content(&self, other: &Self) -> bool {
        Self {
            updated_at: other.updated_at,
            ..self.clone()
        } == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStudentEntry {
    pub student_id: String,
    pub name: String,
    pub program: String,
    pub section: String,
    pub college: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub updated_at: EpochMillis,
}

impl CompanyStudentEntry {
    pub fn from_student(student: &StudentRecord) -> Self {
        let data = &student.data;
        Self {
            student_id: student.id.clone(),
            name: data.name.clone(),
            program: data.program.clone(),
            section: data.section.trim().to_string(),
            college: data.college.clone(),
            start_date: data.start_date,
            end_date: data.end_date,
            updated_at: student.updated_at,
        }
    }

    fn same_content(&self, other: &Self) -> bool {
        Self {
            updated_at: other.updated_at,
            ..self.clone()
        } == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Creates the SectionRecord when absent, then writes the entry. A created
    /// section belongs to `instructor_id`, the instructor who placed the student.
    AddSectionEntry {
        section: String,
        college: String,
        instructor_id: String,
        entry: SectionStudentEntry,
    },
    PatchSectionEntry {
        section: String,
        entry: SectionStudentEntry,
    },
    RemoveSectionEntry {
        section: String,
        student_id: String,
    },
    /// Creates the CompanyRecord when absent, then writes the entry.
    AddCompanyEntry {
        company_key: String,
        company_name: String,
        entry: CompanyStudentEntry,
    },
    PatchCompanyEntry {
        company_key: String,
        entry: CompanyStudentEntry,
    },
    RemoveCompanyEntry {
        company_key: String,
        student_id: String,
    },
}

/// Plans the read model mutations for a student going from `previous` to
/// `next`. `None` on the left is a create, `None` on the right a delete.
pub fn plan(previous: Option<&StudentRecord>, next: Option<&StudentRecord>) -> Vec<Mutation> {
    let mut mutations = plan_section(previous, next);
    mutations.extend(plan_company(previous, next));
    mutations
}

fn plan_section(previous: Option<&StudentRecord>, next: Option<&StudentRecord>) -> Vec<Mutation> {
    let old_section = previous.and_then(|s| s.data.section_name());
    let new_section = next.and_then(|s| s.data.section_name());

    match (previous, next) {
        (Some(old), Some(new)) if old_section == new_section => {
            let Some(section) = new_section else {
                return Vec::new();
            };
            let before = SectionStudentEntry::from_student(old);
            let after = SectionStudentEntry::from_student(new);
            if before.same_content(&after) {
                Vec::new()
            } else {
                vec![Mutation::PatchSectionEntry {
                    section: section.to_string(),
                    entry: after,
                }]
            }
        }
        _ => {
            let mut mutations = Vec::new();
            if let (Some(old), Some(section)) = (previous, old_section) {
                mutations.push(Mutation::RemoveSectionEntry {
                    section: section.to_string(),
                    student_id: old.id.clone(),
                });
            }
            if let (Some(new), Some(section)) = (next, new_section) {
                mutations.push(Mutation::AddSectionEntry {
                    section: section.to_string(),
                    college: new.data.college.clone(),
                    instructor_id: new.updated_by.clone(),
                    entry: SectionStudentEntry::from_student(new),
                });
            }
            mutations
        }
    }
}

fn plan_company(previous: Option<&StudentRecord>, next: Option<&StudentRecord>) -> Vec<Mutation> {
    let company_of = |student: &StudentRecord| {
        student
            .data
            .company_name()
            .and_then(|name| normalize_company_key(name).map(|key| (key, name.to_string())))
    };
    let old_company = previous.and_then(company_of);
    let new_company = next.and_then(company_of);
    let old_key = old_company.as_ref().map(|(key, _)| key);
    let new_key = new_company.as_ref().map(|(key, _)| key);

    match (previous, next) {
        (Some(old), Some(new)) if old_key == new_key => {
            let Some(company_key) = new_key else {
                return Vec::new();
            };
            let before = CompanyStudentEntry::from_student(old);
            let after = CompanyStudentEntry::from_student(new);
            if before.same_content(&after) {
                Vec::new()
            } else {
                vec![Mutation::PatchCompanyEntry {
                    company_key: company_key.clone(),
                    entry: after,
                }]
            }
        }
        _ => {
            let mut mutations = Vec::new();
            if let (Some(old), Some((company_key, _))) = (previous, old_company.as_ref()) {
                mutations.push(Mutation::RemoveCompanyEntry {
                    company_key: company_key.clone(),
                    student_id: old.id.clone(),
                });
            }
            if let (Some(new), Some((company_key, company_name))) = (next, new_company) {
                mutations.push(Mutation::AddCompanyEntry {
                    company_key,
                    company_name,
                    entry: CompanyStudentEntry::from_student(new),
                });
            }
            mutations
        }
    }
}
