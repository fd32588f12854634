use crate::modules::students::adapters::outbound::projections::apply_best_effort;
use crate::modules::students::core::projections::plan;
use crate::modules::students::core::student::{STUDENTS_COLLECTION, StudentRecord};
use crate::modules::students::use_cases::delete_student::command::DeleteStudent;
use crate::modules::students::use_cases::errors::ApplicationError;
use crate::shared::infrastructure::record_store::{RecordStore, get_as};
use std::sync::Arc;
use tracing::instrument;

pub struct DeleteStudentHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
}

impl<TStore> DeleteStudentHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    #[instrument(level = "info", skip_all, fields(student_id = %command.student_id))]
    pub async fn handle(&self, command: DeleteStudent) -> Result<StudentRecord, ApplicationError> {
        let previous: StudentRecord =
            get_as(&*self.store, STUDENTS_COLLECTION, &command.student_id)
                .await?
                .ok_or_else(|| ApplicationError::NotFound {
                    entity: "student",
                    id: command.student_id.clone(),
                })?;

        self.store
            .delete(STUDENTS_COLLECTION, &command.student_id)
            .await?;
        tracing::info!("student deleted");

        let mutations = plan(Some(&previous), None);
        apply_best_effort(&*self.store, &command.actor, command.deleted_at, &mutations).await;
        Ok(previous)
    }
}
