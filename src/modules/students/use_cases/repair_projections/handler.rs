// Rebuilds the section and company read models from the student records.
//
// Purpose
// - Heal entries left stale by best-effort writes that failed or were interrupted.
//
// Responsibilities
// - Add or overwrite every entry whose stored copy differs from its student.
// - Remove entries whose student no longer belongs to that section or company.
// - Reuse the same mutation writer as the live synchronization path.

use crate::modules::students::adapters::outbound::projections::{SyncFailure, apply_best_effort};
use crate::modules::students::core::projections::{
    COMPANIES_COLLECTION, CompanyStudentEntry, Mutation, SECTIONS_COLLECTION,
    SectionStudentEntry, company_students_collection, plan, section_students_collection,
};
use crate::modules::students::core::student::{STUDENTS_COLLECTION, StudentRecord};
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::core::primitives::{Actor, EpochMillis};
use crate::shared::infrastructure::record_store::{
    RecordStore, RecordStoreError, StoredDocument, decode,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub students_scanned: usize,
    pub upserted: usize,
    pub removed: usize,
    pub failed: usize,
}

pub struct RepairProjectionsHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> RepairProjectionsHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    #[instrument(level = "info", skip_all, fields(actor = %actor.id))]
    pub async fn handle(&self, actor: &Actor, now: EpochMillis) -> Result<RepairReport, ApplicationError> {
        let students: Vec<StudentRecord> = decode_all(
            STUDENTS_COLLECTION,
            self.store.list(STUDENTS_COLLECTION).await?,
        )?;

        // Entries each parent should hold, keyed by parent then student id.
        let mut wanted_sections: BTreeMap<String, BTreeMap<String, Mutation>> = BTreeMap::new();
        let mut wanted_companies: BTreeMap<String, BTreeMap<String, Mutation>> = BTreeMap::new();
        for student in &students {
            for mutation in plan(None, Some(student)) {
                let wanted = match &mutation {
                    Mutation::AddSectionEntry { section, .. } => {
                        wanted_sections.entry(section.clone()).or_default()
                    }
                    Mutation::AddCompanyEntry { company_key, .. } => {
                        wanted_companies.entry(company_key.clone()).or_default()
                    }
                    _ => continue,
                };
                wanted.insert(student.id.clone(), mutation);
            }
        }

        let mut mutations = Vec::new();

        let mut sections: BTreeSet<String> = wanted_sections.keys().cloned().collect();
        sections.extend(document_ids(self.store.list(SECTIONS_COLLECTION).await?));
        for section in sections {
            let stored: BTreeMap<String, SectionStudentEntry> =
                self.stored_entries(&section_students_collection(&section)).await?;
            let wanted = wanted_sections.remove(&section).unwrap_or_default();
            for student_id in stored.keys().filter(|id| !wanted.contains_key(*id)) {
                mutations.push(Mutation::RemoveSectionEntry {
                    section: section.clone(),
                    student_id: student_id.clone(),
                });
            }
            for (student_id, add) in wanted {
                let current = matches!(
                    (&add, stored.get(&student_id)),
                    (Mutation::AddSectionEntry { entry, .. }, Some(existing)) if entry == existing
                );
                if !current {
                    mutations.push(add);
                }
            }
        }

        let mut companies: BTreeSet<String> = wanted_companies.keys().cloned().collect();
        companies.extend(document_ids(self.store.list(COMPANIES_COLLECTION).await?));
        for company_key in companies {
            let stored: BTreeMap<String, CompanyStudentEntry> =
                self.stored_entries(&company_students_collection(&company_key)).await?;
            let wanted = wanted_companies.remove(&company_key).unwrap_or_default();
            for student_id in stored.keys().filter(|id| !wanted.contains_key(*id)) {
                mutations.push(Mutation::RemoveCompanyEntry {
                    company_key: company_key.clone(),
                    student_id: student_id.clone(),
                });
            }
            for (student_id, add) in wanted {
                let current = matches!(
                    (&add, stored.get(&student_id)),
                    (Mutation::AddCompanyEntry { entry, .. }, Some(existing)) if entry == existing
                );
                if !current {
                    mutations.push(add);
                }
            }
        }

        let failures = apply_best_effort(&*self.store, actor, now, &mutations).await;
        let report = summarize(students.len(), &mutations, &failures);
        tracing::info!(
            scanned = report.students_scanned,
            upserted = report.upserted,
            removed = report.removed,
            failed = report.failed,
            "read models repaired"
        );
        Ok(report)
    }

    /// Stored entries under one parent. Unreadable entries count as absent
    /// so they get rewritten.
    async fn stored_entries<T>(&self, collection: &str) -> Result<BTreeMap<String, T>, RecordStoreError>
    where
        T: DeserializeOwned,
    {
        let mut entries = BTreeMap::new();
        for document in self.store.list(collection).await? {
            match decode::<T>(collection, &document.id, document.data) {
                Ok(entry) => {
                    entries.insert(document.id, entry);
                }
                Err(error) => {
                    tracing::warn!(%collection, id = %document.id, %error, "unreadable entry");
                }
            }
        }
        Ok(entries)
    }
}

fn document_ids(documents: Vec<StoredDocument>) -> impl Iterator<Item = String> {
    documents.into_iter().map(|d| d.id)
}

fn decode_all<T>(collection: &str, documents: Vec<StoredDocument>) -> Result<Vec<T>, RecordStoreError>
where
    T: DeserializeOwned,
{
    documents
        .into_iter()
        .map(|d| decode(collection, &d.id, d.data))
        .collect()
}

fn summarize(scanned: usize, mutations: &[Mutation], failures: &[SyncFailure]) -> RepairReport {
    let removed = mutations
        .iter()
        .filter(|m| matches!(m, Mutation::RemoveSectionEntry { .. } | Mutation::RemoveCompanyEntry { .. }))
        .count();
    RepairReport {
        students_scanned: scanned,
        upserted: mutations.len() - removed,
        removed,
        failed: failures.len(),
    }
}
