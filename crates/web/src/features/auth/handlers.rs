use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::{
    ACCESS_TOKEN_COOKIE, OAUTH_STATE_COOKIE, REFRESH_TOKEN_COOKIE, USER_COOKIE, access_token,
    encode_user, session_user,
};
use crate::startgg::Viewer;
use crate::state::AppState;

/// Fallback session lifetime when the token response omits `expires_in`.
const DEFAULT_SESSION_SECONDS: i64 = 7 * 24 * 60 * 60;
const OAUTH_STATE_SECONDS: i64 = 10 * 60;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<Viewer>,
}

#[utoipa::path(
    get,
    path = "/api/auth/login",
    responses(
        (status = 307, description = "Redirect to the start.gg consent screen"),
        (status = 500, description = "OAuth credentials not configured")
    ),
    tag = "auth"
)]
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> Result<Response, WebError> {
    let client_id = state.config.require_client_id()?;
    let redirect_uri = state.config.require_redirect_uri()?;

    let oauth_state = Uuid::new_v4().simple().to_string();
    let url = state.startgg.authorize_url(
        client_id,
        redirect_uri,
        &state.config.startgg_oauth_scope,
        &oauth_state,
    )?;

    let jar = jar.add(session_cookie(
        &state,
        OAUTH_STATE_COOKIE,
        oauth_state,
        true,
        OAUTH_STATE_SECONDS,
    ));

    Ok((jar, Redirect::temporary(&url)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/callback",
    responses(
        (status = 307, description = "Session established, redirect to the dashboard"),
        (status = 400, description = "Missing code or state mismatch"),
        (status = 502, description = "Token exchange failed")
    ),
    tag = "auth"
)]
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, WebError> {
    if let Some(error) = query.error {
        return Err(WebError::BadRequest(format!(
            "Authorization was denied: {}",
            error
        )));
    }

    let code = query
        .code
        .ok_or_else(|| WebError::BadRequest("Missing authorization code".to_string()))?;

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    if expected_state.is_none() || query.state != expected_state {
        return Err(WebError::BadRequest("OAuth state mismatch".to_string()));
    }

    let client_id = state.config.require_client_id()?;
    let client_secret = state.config.require_client_secret()?;
    let redirect_uri = state.config.require_redirect_uri()?;

    let token = state
        .startgg
        .exchange_code(client_id, client_secret, redirect_uri, &code)
        .await?;

    let max_age = token.expires_in.unwrap_or(DEFAULT_SESSION_SECONDS);
    let mut jar = jar
        .remove(removal_cookie(OAUTH_STATE_COOKIE))
        .add(session_cookie(
            &state,
            ACCESS_TOKEN_COOKIE,
            token.access_token.clone(),
            true,
            max_age,
        ));

    if let Some(refresh_token) = token.refresh_token.clone() {
        jar = jar.add(session_cookie(
            &state,
            REFRESH_TOKEN_COOKIE,
            refresh_token,
            true,
            max_age,
        ));
    }

    if let Some(encoded) = state
        .startgg
        .fetch_viewer(&token.access_token)
        .await
        .as_ref()
        .and_then(encode_user)
    {
        jar = jar.add(session_cookie(&state, USER_COOKIE, encoded, false, max_age));
    }

    tracing::info!("start.gg session established");

    Ok((jar, Redirect::temporary("/")).into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse)
    ),
    tag = "auth"
)]
pub async fn session(jar: CookieJar) -> Response {
    let authenticated = access_token(&jar).is_some();

    Json(SessionResponse {
        authenticated,
        user: authenticated.then(|| session_user(&jar)).flatten(),
    })
    .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookies cleared", body = SessionResponse)
    ),
    tag = "auth"
)]
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar
        .remove(removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE))
        .remove(removal_cookie(USER_COOKIE))
        .remove(removal_cookie(OAUTH_STATE_COOKIE));

    (
        jar,
        Json(SessionResponse {
            authenticated: false,
            user: None,
        }),
    )
        .into_response()
}

// Removal only takes effect when the path matches the original cookie.
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn session_cookie(
    state: &AppState,
    name: &'static str,
    value: String,
    http_only: bool,
    max_age_seconds: i64,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}
