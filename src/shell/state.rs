use crate::modules::evaluations::adapters::outbound::status_store::EvaluationStatusStore;
use crate::modules::reports::core::institution::InstitutionMeta;
use crate::modules::reports::use_cases::export_report::handler::ExportReportHandler;
use crate::modules::students::use_cases::create_student::handler::CreateStudentHandler;
use crate::modules::students::use_cases::delete_student::handler::DeleteStudentHandler;
use crate::modules::students::use_cases::ensure_sections::handler::EnsureSectionsHandler;
use crate::modules::students::use_cases::repair_projections::handler::RepairProjectionsHandler;
use crate::modules::students::use_cases::update_student::handler::UpdateStudentHandler;
use crate::shared::infrastructure::record_store::in_memory::InMemoryRecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub create_student: Arc<CreateStudentHandler<InMemoryRecordStore>>,
    pub update_student: Arc<UpdateStudentHandler<InMemoryRecordStore>>,
    pub delete_student: Arc<DeleteStudentHandler<InMemoryRecordStore>>,
    pub ensure_sections: Arc<EnsureSectionsHandler<InMemoryRecordStore>>,
    pub repair_projections: Arc<RepairProjectionsHandler<InMemoryRecordStore>>,
    pub export_report: Arc<ExportReportHandler<InMemoryRecordStore>>,
    pub evaluation_status: Arc<EvaluationStatusStore>,
}

impl AppState {
    pub fn new(
        store: Arc<InMemoryRecordStore>,
        evaluation_status: Arc<EvaluationStatusStore>,
        institution: InstitutionMeta,
    ) -> Self {
        Self {
            create_student: Arc::new(CreateStudentHandler::new(store.clone())),
            update_student: Arc::new(UpdateStudentHandler::new(store.clone())),
            delete_student: Arc::new(DeleteStudentHandler::new(store.clone())),
            ensure_sections: Arc::new(EnsureSectionsHandler::new(store.clone())),
            repair_projections: Arc::new(RepairProjectionsHandler::new(store.clone())),
            export_report: Arc::new(ExportReportHandler::new(store, institution)),
            evaluation_status,
        }
    }

    #[cfg(test)]
    pub fn for_tests(store: Arc<InMemoryRecordStore>) -> Self {
        Self::new(
            store,
            Arc::new(EvaluationStatusStore::new()),
            InstitutionMeta::default(),
        )
    }
}
