use crate::modules::students::adapters::outbound::projections::apply_best_effort;
use crate::modules::students::core::projections::plan;
use crate::modules::students::core::student::{STUDENTS_COLLECTION, StudentRecord};
use crate::modules::students::core::validation::validate_student;
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::modules::students::use_cases::update_student::command::UpdateStudent;
use crate::shared::core::primitives::non_blank;
use crate::shared::infrastructure::record_store::{RecordStore, encode, get_as};
use std::sync::Arc;
use tracing::instrument;

pub struct UpdateStudentHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> UpdateStudentHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    /// Replaces the editable fields of a student. Audit fields of the
    /// creation are kept and blank access keys fall back to the stored ones.
    #[instrument(level = "info", skip_all, fields(student_id = %command.student_id))]
    pub async fn handle(&self, command: UpdateStudent) -> Result<StudentRecord, ApplicationError> {
        let UpdateStudent {
            student_id,
            mut data,
            actor,
            updated_at,
        } = command;
        validate_student(&data)?;

        let previous: StudentRecord = get_as(&*self.store, STUDENTS_COLLECTION, &student_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound {
                entity: "student",
                id: student_id.clone(),
            })?;

        if non_blank(&data.midterms_key).is_none() {
            data.midterms_key = previous.data.midterms_key.clone();
        }
        if non_blank(&data.finals_key).is_none() {
            data.finals_key = previous.data.finals_key.clone();
        }

        let record = StudentRecord {
            id: student_id,
            data,
            created_at: previous.created_at,
            created_by: previous.created_by.clone(),
            updated_at,
            updated_by: actor.id.clone(),
        };
        let document = encode(STUDENTS_COLLECTION, &record.id, &record)?;
        self.store
            .set(STUDENTS_COLLECTION, &record.id, document)
            .await?;
        tracing::info!("student updated");

        let mutations = plan(Some(&previous), Some(&record));
        apply_best_effort(&*self.store, &actor, updated_at, &mutations).await;
        Ok(record)
    }
}
