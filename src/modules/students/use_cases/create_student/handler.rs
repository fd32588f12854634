use crate::modules::students::adapters::outbound::projections::apply_best_effort;
use crate::modules::students::core::access_keys::ensure_access_keys;
use crate::modules::students::core::projections::plan;
use crate::modules::students::core::student::{STUDENTS_COLLECTION, StudentRecord};
use crate::modules::students::core::validation::validate_student;
use crate::modules::students::use_cases::create_student::command::CreateStudent;
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::record_store::{RecordStore, encode};
use std::sync::Arc;
use tracing::instrument;

pub struct CreateStudentHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> CreateStudentHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    /// Writes the student, then files it under its section and company.
    /// Only the student write can fail the call.
    #[instrument(level = "info", skip_all, fields(student_id = %command.student_id))]
    pub async fn handle(&self, command: CreateStudent) -> Result<StudentRecord, ApplicationError> {
        let CreateStudent {
            student_id,
            mut data,
            actor,
            created_at,
        } = command;
        validate_student(&data)?;
        ensure_access_keys(&mut data);

        let record = StudentRecord {
            id: student_id,
            data,
            created_at,
            created_by: actor.id.clone(),
            updated_at: created_at,
            updated_by: actor.id.clone(),
        };
        let document = encode(STUDENTS_COLLECTION, &record.id, &record)?;
        self.store
            .create(STUDENTS_COLLECTION, &record.id, document)
            .await?;
        tracing::info!("student created");

        let failures =
            apply_best_effort(&*self.store, &actor, created_at, &plan(None, Some(&record))).await;
        if !failures.is_empty() {
            tracing::debug!(failed = failures.len(), "student created with stale read models");
        }
        Ok(record)
    }
}
