// Guarantees a SectionRecord exists for every section an instructor handles.
//
// Responsibilities
// - Create missing SectionRecords owned by the requesting instructor.
// - Never overwrite a section that already exists, whoever owns it.
// - Report the outcome per section so callers can surface ownership clashes.

use crate::modules::students::core::projections::{SECTIONS_COLLECTION, SectionRecord};
use crate::modules::students::core::validation::validate_section_name;
use crate::modules::students::use_cases::ensure_sections::command::{
    EnsureSections, InstructorProfile,
};
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::record_store::{
    RecordStore, RecordStoreError, encode, get_as,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SectionClaimOutcome {
    Created,
    AlreadyOwned,
    #[serde(rename_all = "camelCase")]
    ClaimedByOther {
        instructor_id: String,
        instructor_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionClaim {
    pub section_name: String,
    #[serde(flatten)]
    pub outcome: SectionClaimOutcome,
}

pub struct EnsureSectionsHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> EnsureSectionsHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    #[instrument(level = "info", skip_all, fields(instructor_id = %command.profile.id))]
    pub async fn handle(&self, command: EnsureSections) -> Result<Vec<SectionClaim>, ApplicationError> {
        let names = command.profile.sections.names();
        for name in &names {
            validate_section_name(name)?;
        }

        let mut claims = Vec::with_capacity(names.len());
        for section_name in names {
            let outcome = self
                .claim(&command.profile, &section_name, command.requested_at)
                .await?;
            if let SectionClaimOutcome::ClaimedByOther { instructor_id, .. } = &outcome {
                tracing::warn!(
                    section = %section_name,
                    owner = %instructor_id,
                    "section already belongs to another instructor"
                );
            }
            claims.push(SectionClaim {
                section_name,
                outcome,
            });
        }
        Ok(claims)
    }

    async fn claim(
        &self,
        profile: &InstructorProfile,
        section_name: &str,
        now: i64,
    ) -> Result<SectionClaimOutcome, ApplicationError> {
        if let Some(existing) = self.existing(section_name).await? {
            return Ok(classify(profile, existing));
        }

        let record = SectionRecord {
            section_name: section_name.to_string(),
            college: profile.college.clone(),
            instructor_id: profile.id.clone(),
            instructor_name: profile.name.clone(),
            created_at: now,
            created_by: profile.id.clone(),
            updated_at: now,
            updated_by: profile.id.clone(),
        };
        let document = encode(SECTIONS_COLLECTION, section_name, &record)?;
        match self.store.create(SECTIONS_COLLECTION, section_name, document).await {
            Ok(()) => {
                tracing::info!(section = %section_name, "section created");
                Ok(SectionClaimOutcome::Created)
            }
            // Lost a race with another writer; report whoever won.
            Err(RecordStoreError::AlreadyExists { .. }) => {
                let winner = self.existing(section_name).await?.ok_or_else(|| {
                    ApplicationError::Unexpected(format!(
                        "section {section_name} vanished after a conflicting create"
                    ))
                })?;
                Ok(classify(profile, winner))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn existing(&self, section_name: &str) -> Result<Option<SectionRecord>, RecordStoreError> {
        get_as(&*self.store, SECTIONS_COLLECTION, section_name).await
    }
}

fn classify(profile: &InstructorProfile, existing: SectionRecord) -> SectionClaimOutcome {
    if existing.instructor_id == profile.id {
        SectionClaimOutcome::AlreadyOwned
    } else {
        SectionClaimOutcome::ClaimedByOther {
            instructor_id: existing.instructor_id,
            instructor_name: existing.instructor_name,
        }
    }
}
