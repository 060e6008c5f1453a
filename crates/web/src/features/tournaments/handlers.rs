use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::error::WebError;
use crate::middleware::auth::access_token;
use crate::startgg::TournamentSummary;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/startgg/tournaments",
    responses(
        (status = 200, description = "Tournaments the signed-in user manages", body = Vec<TournamentSummary>),
        (status = 401, description = "No session"),
        (status = 502, description = "start.gg rejected the request")
    ),
    tag = "startgg"
)]
pub async fn list_tournaments(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, WebError> {
    let token = access_token(&jar).ok_or(WebError::Unauthorized)?;

    let tournaments = state.startgg.managed_tournaments(&token).await?;

    Ok(Json(tournaments).into_response())
}
