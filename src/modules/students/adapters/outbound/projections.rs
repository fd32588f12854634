// Applies planned read model mutations to the record store.
//
// Purpose
// - Translate each Mutation into point writes on the section and company collections.
//
// Responsibilities
// - Create the parent SectionRecord / CompanyRecord when an entry is added under a missing parent.
// - A created SectionRecord belongs to the instructor named by the mutation, not the writer.
// - Best effort: every mutation is attempted, failures are logged and collected, never raised.

use crate::modules::students::core::projections::{
    COMPANIES_COLLECTION, CompanyRecord, Mutation, SECTIONS_COLLECTION, SectionRecord,
    company_students_collection, section_students_collection,
};
use crate::shared::core::primitives::{Actor, EpochMillis};
use crate::shared::infrastructure::record_store::{RecordStore, RecordStoreError, encode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub collection: String,
    pub document_id: String,
    pub error: RecordStoreError,
}

impl Mutation {
    /// Collection and document id of the entry this mutation touches.
    pub fn target(&self) -> (String, &str) {
        match self {
            Mutation::AddSectionEntry { section, entry, .. }
            | Mutation::PatchSectionEntry { section, entry } => {
                (section_students_collection(section), entry.student_id.as_str())
            }
            Mutation::RemoveSectionEntry {
                section,
                student_id,
            } => (section_students_collection(section), student_id.as_str()),
            Mutation::AddCompanyEntry {
                company_key, entry, ..
            }
            | Mutation::PatchCompanyEntry { company_key, entry } => {
                (company_students_collection(company_key), entry.student_id.as_str())
            }
            Mutation::RemoveCompanyEntry {
                company_key,
                student_id,
            } => (company_students_collection(company_key), student_id.as_str()),
        }
    }
}

pub async fn apply_mutation<TStore>(
    store: &TStore,
    actor: &Actor,
    now: EpochMillis,
    mutation: &Mutation,
) -> Result<(), RecordStoreError>
where
    TStore: RecordStore + ?Sized,
{
    let (collection, id) = mutation.target();
    match mutation {
        Mutation::AddSectionEntry {
            section,
            college,
            instructor_id,
            entry,
        } => {
            // The writer only knows its own display name.
            let instructor_name = if *instructor_id == actor.id {
                actor.name.clone()
            } else {
                String::new()
            };
            let parent = SectionRecord {
                section_name: section.clone(),
                college: college.clone(),
                instructor_id: instructor_id.clone(),
                instructor_name,
                created_at: now,
                created_by: actor.id.clone(),
                updated_at: now,
                updated_by: actor.id.clone(),
            };
            let document = encode(SECTIONS_COLLECTION, section, &parent)?;
            create_parent(store, SECTIONS_COLLECTION, section, document).await?;
            store.set(&collection, id, encode(&collection, id, entry)?).await
        }
        Mutation::AddCompanyEntry {
            company_key,
            company_name,
            entry,
        } => {
            let parent = CompanyRecord {
                company_name: company_name.clone(),
                company_key: company_key.clone(),
                created_at: now,
                created_by: actor.id.clone(),
                updated_at: now,
                updated_by: actor.id.clone(),
            };
            let document = encode(COMPANIES_COLLECTION, company_key, &parent)?;
            create_parent(store, COMPANIES_COLLECTION, company_key, document).await?;
            store.set(&collection, id, encode(&collection, id, entry)?).await
        }
        Mutation::PatchSectionEntry { entry, .. } => {
            store.update(&collection, id, encode(&collection, id, entry)?).await
        }
        Mutation::PatchCompanyEntry { entry, .. } => {
            store.update(&collection, id, encode(&collection, id, entry)?).await
        }
        Mutation::RemoveSectionEntry { .. } | Mutation::RemoveCompanyEntry { .. } => {
            store.delete(&collection, id).await
        }
    }
}

async fn create_parent<TStore>(
    store: &TStore,
    collection: &str,
    id: &str,
    document: serde_json::Value,
) -> Result<(), RecordStoreError>
where
    TStore: RecordStore + ?Sized,
{
    match store.create(collection, id, document).await {
        Ok(()) => {
            tracing::info!(collection, id, "created parent record");
            Ok(())
        }
        Err(RecordStoreError::AlreadyExists { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Applies every mutation in order. A failure never stops the next one.
pub async fn apply_best_effort<TStore>(
    store: &TStore,
    actor: &Actor,
    now: EpochMillis,
    mutations: &[Mutation],
) -> Vec<SyncFailure>
where
    TStore: RecordStore + ?Sized,
{
    let mut failures = Vec::new();
    for mutation in mutations {
        if let Err(error) = apply_mutation(store, actor, now, mutation).await {
            let (collection, document_id) = mutation.target();
            tracing::warn!(
                %collection,
                document_id,
                %error,
                "denormalized write failed, continuing"
            );
            failures.push(SyncFailure {
                collection,
                document_id: document_id.to_string(),
                error,
            });
        }
    }
    failures
}
