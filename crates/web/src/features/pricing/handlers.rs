use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::pricing::{PricingResponse, UpdatePricingRequest},
    repository::tournament::TournamentRepository,
};
use validator::Validate;

use crate::error::WebError;
use crate::features::participants::handlers::publish_snapshot;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/tournaments/{tournament_id}/pricing",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier")
    ),
    responses(
        (status = 200, description = "Stored pricing configuration, or the defaults", body = PricingResponse)
    ),
    tag = "pricing"
)]
pub async fn get_pricing(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
) -> Result<Response, WebError> {
    let snapshot = TournamentRepository::new(state.db.pool())
        .get_pricing(&tournament_id)
        .await?;

    Ok(Json(PricingResponse {
        pricing_config: snapshot.config,
        source: if snapshot.stored { "stored" } else { "default" },
        name: snapshot.name,
    })
    .into_response())
}

#[utoipa::path(
    put,
    path = "/api/tournaments/{tournament_id}/pricing",
    params(
        ("tournament_id" = String, Path, description = "Tournament identifier")
    ),
    request_body = UpdatePricingRequest,
    responses(
        (status = 200, description = "Pricing configuration saved", body = PricingResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "No session")
    ),
    tag = "pricing"
)]
pub async fn update_pricing(
    State(state): State<AppState>,
    Path(tournament_id): Path<String>,
    Json(request): Json<UpdatePricingRequest>,
) -> Result<Response, WebError> {
    request.validate()?;

    let config = TournamentRepository::new(state.db.pool())
        .upsert_pricing(&tournament_id, request.pricing_config, request.name.as_deref())
        .await?;

    tracing::info!(%tournament_id, "Pricing configuration updated");

    // Payment statuses in the roster are derived from pricing.
    publish_snapshot(&state, &tournament_id).await;

    Ok(Json(PricingResponse {
        pricing_config: config,
        source: "stored",
        name: request.name,
    })
    .into_response())
}
