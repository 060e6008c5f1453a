use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use futures::StreamExt;
use storage::dto::participant::{
    CheckInRequest, CheckInResponse, ImportRosterRequest, ImportRosterResponse,
    ParticipantResponse,
};
use tokio::sync::broadcast;

use super::hub::Snapshot;
use super::services;
use crate::error::WebError;
use crate::middleware::auth::session_user;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/participants",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier")
    ),
    responses(
        (status = 200, description = "Roster with computed payment statuses", body = Vec<ParticipantResponse>)
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Response, WebError> {
    let snapshot = services::snapshot(state.db.pool(), &tournament_id).await?;

    Ok(Json(snapshot).into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/participants/import",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier")
    ),
    request_body = ImportRosterRequest,
    responses(
        (status = 200, description = "Roster merged", body = ImportRosterResponse),
        (status = 400, description = "No recognizable header row, or no data rows"),
        (status = 401, description = "No session")
    ),
    tag = "participants"
)]
pub async fn import_roster(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
    Json(request): Json<ImportRosterRequest>,
) -> Result<Response, WebError> {
    let candidates = importer::parse_rows(&request.rows)?;
    let count = services::merge_candidates(state.db.pool(), &tournament_id, &candidates).await?;

    tracing::info!(%tournament_id, count, "Roster import merged");
    publish_snapshot(&state, &tournament_id).await;

    Ok(Json(ImportRosterResponse { ok: true, count }).into_response())
}

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/participants/stream",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier")
    ),
    responses(
        (status = 200, description = "Server-sent events; a full roster snapshot per message")
    ),
    tag = "participants"
)]
pub async fn stream_participants(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Response, WebError> {
    // Subscribe before the initial read: a write that commits in between is
    // then buffered on the channel instead of lost, and since every message
    // is a full snapshot, replaying it after the initial one converges.
    let receiver = state.hub.subscribe(&tournament_id);
    let initial: Snapshot =
        Arc::new(services::snapshot(state.db.pool(), &tournament_id).await?);

    // Every message carries the whole roster, so a lagged reader just waits
    // for the next one instead of resynchronizing.
    let updates = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(snapshot) => return Some((snapshot_event(&snapshot), receiver)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    let stream = futures::stream::once(async move { snapshot_event(&initial) })
        .chain(updates)
        .map(Ok::<_, Infallible>);

    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/tournaments/{tournament_id}/participants/{participant_id}/checkin",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier"),
        ("participant_id" = String, Path, description = "Participant identifier")
    ),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Adjustment requires a reason and a non-zero amount"),
        (status = 401, description = "No session"),
        (status = 404, description = "Unknown participant"),
        (status = 409, description = "Already checked in")
    ),
    tag = "participants"
)]
pub async fn check_in(
    State(state): State<AppState>,
    Path((tournament_id, participant_id)): Path<(String, String)>,
    jar: CookieJar,
    Json(request): Json<CheckInRequest>,
) -> Result<Response, WebError> {
    let operator_id = request
        .operator_user_id
        .filter(|id| !id.trim().is_empty())
        .or_else(|| session_user(&jar).and_then(|user| user.operator_id()))
        .unwrap_or_else(|| "operator".to_string());

    let (updated, note_entry, pricing) = services::check_in(
        state.db.pool(),
        &tournament_id,
        &participant_id,
        &request.adjustment_key,
        request.custom_delta,
        &request.custom_reason,
        &operator_id,
        Utc::now(),
    )
    .await?;

    tracing::info!(%tournament_id, %participant_id, %operator_id, "Check-in recorded");
    publish_snapshot(&state, &tournament_id).await;

    Ok(Json(CheckInResponse {
        ok: true,
        note_entry,
        participant: ParticipantResponse::from_model(updated, &pricing),
    })
    .into_response())
}

/// Refreshes subscribers after a mutation. Failures only cost liveness, so
/// they are logged instead of failing the request that caused them.
pub async fn publish_snapshot(state: &AppState, tournament_id: &str) {
    match services::snapshot(state.db.pool(), tournament_id).await {
        Ok(snapshot) => state.hub.publish(tournament_id, Arc::new(snapshot)),
        Err(e) => tracing::error!(tournament_id, "Failed to rebuild roster snapshot: {}", e),
    }
}

fn snapshot_event(snapshot: &[ParticipantResponse]) -> Event {
    match serde_json::to_string(snapshot) {
        Ok(body) => Event::default().event("snapshot").data(body),
        Err(e) => {
            tracing::error!("Failed to serialize roster snapshot: {}", e);
            Event::default().event("snapshot").data("[]")
        }
    }
}
