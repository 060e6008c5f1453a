use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::participant::{ScanRequest, ScanResponse};

use super::scan::extract_participant_id;
use crate::error::WebError;
use crate::features::participants::services;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/scan",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier")
    ),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Participant resolved", body = ScanResponse),
        (status = 404, description = "No such participant in this tournament"),
        (status = 422, description = "Input carried no participant identifier")
    ),
    tag = "kiosk"
)]
pub async fn scan(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
    Json(request): Json<ScanRequest>,
) -> Result<Response, WebError> {
    let participant_id = extract_participant_id(&request.raw).ok_or_else(|| {
        WebError::Unprocessable("Could not read a participant identifier from the scan".to_string())
    })?;

    let participant =
        services::find_participant(state.db.pool(), &tournament_id, &participant_id).await?;

    Ok(Json(ScanResponse { participant }).into_response())
}
