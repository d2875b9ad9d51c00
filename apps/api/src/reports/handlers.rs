use axum::{extract::State, Json};

use crate::errors::{AppError, AppJson};
use crate::reports::{generate_report, ReportRequest, ReportResponse};
use crate::state::AppState;

/// POST /api/v1/reports/generate
pub async fn handle_generate_report(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReportRequest>,
) -> Result<Json<ReportResponse>, AppError> {
    let response = generate_report(&state.llm, request).await?;
    Ok(Json(response))
}
