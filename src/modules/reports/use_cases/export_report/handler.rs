use crate::modules::evaluations::core::submission::EvaluationSubmission;
use crate::modules::reports::adapters::outbound::xlsx::{ExportError, export_report};
use crate::modules::reports::core::institution::InstitutionMeta;
use crate::modules::reports::core::report::{Report, ReportKind};
use crate::modules::students::core::student::{STUDENTS_COLLECTION, StudentRecord};
use crate::shared::infrastructure::record_store::{
    RecordStore, RecordStoreError, decode, decode_or_skip,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] RecordStoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ExportReportHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    store: Arc<TStore>,
    institution: InstitutionMeta,
}

impl<TStore> ExportReportHandler<TStore>
where
    TStore: RecordStore + 'static,
{
    pub fn new(store: Arc<TStore>, institution: InstitutionMeta) -> Self {
        Self { store, institution }
    }

    #[instrument(level = "info", skip(self), fields(report = kind.file_stem()))]
    pub async fn handle(&self, kind: ReportKind) -> Result<ExportedReport, ReportError> {
        let report = match kind {
            ReportKind::Roster => Report::Roster(self.students().await?),
            ReportKind::Concerns => Report::Concerns(self.students().await?),
            ReportKind::AccessKeys(term) => Report::AccessKeys {
                term,
                students: self.students().await?,
            },
            ReportKind::SurveyMetrics(evaluation) => {
                let documents = self.store.list(evaluation.collection()).await?;
                let submissions = documents
                    .into_iter()
                    .filter_map(|d| {
                        let mut submission = decode_or_skip::<EvaluationSubmission>(
                            evaluation.collection(),
                            &d.id,
                            d.data,
                        )?;
                        submission.id = d.id;
                        Some(submission)
                    })
                    .collect();
                Report::SurveyMetrics {
                    kind: evaluation,
                    submissions,
                }
            }
        };
        let bytes = export_report(&report, &self.institution)?;
        Ok(ExportedReport {
            file_name: format!("{}.xlsx", kind.file_stem()),
            bytes,
        })
    }

    async fn students(&self) -> Result<Vec<StudentRecord>, RecordStoreError> {
        self.store
            .list(STUDENTS_COLLECTION)
            .await?
            .into_iter()
            .map(|d| decode(STUDENTS_COLLECTION, &d.id, d.data))
            .collect()
    }
}
