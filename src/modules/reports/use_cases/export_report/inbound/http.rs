use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::modules::reports::core::report::ReportKind;
use crate::shell::http::internal_error;
use crate::shell::state::AppState;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn handle(State(state): State<AppState>, Path(kind): Path<String>) -> impl IntoResponse {
    let Ok(kind) = kind.parse::<ReportKind>() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.export_report.handle(kind).await {
        Ok(exported) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", exported.file_name),
                ),
            ],
            exported.bytes,
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
