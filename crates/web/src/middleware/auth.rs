use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::CookieJar;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::WebError;
use crate::startgg::Viewer;

/// start.gg access token; HttpOnly, never exposed to scripts.
pub const ACCESS_TOKEN_COOKIE: &str = "startgg_access_token";
/// Refresh token, kept for a future token-refresh pass; HttpOnly.
pub const REFRESH_TOKEN_COOKIE: &str = "startgg_refresh_token";
/// Base64-encoded profile of the signed-in user, readable by the frontend.
pub const USER_COOKIE: &str = "startgg_user";
/// Short-lived CSRF state for the authorization-code round trip.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

pub fn access_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

pub fn session_user(jar: &CookieJar) -> Option<Viewer> {
    let encoded = jar.get(USER_COOKIE)?.value();
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub fn encode_user(viewer: &Viewer) -> Option<String> {
    serde_json::to_vec(viewer)
        .ok()
        .map(|bytes| URL_SAFE_NO_PAD.encode(bytes))
}

/// Rejects requests that do not carry a session cookie. Token validity is
/// start.gg's call; upstream calls made with a stale token surface as 502s.
pub async fn require_session(
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    if access_token(&jar).is_none() {
        tracing::warn!("Rejected request without a session cookie");
        return Err(WebError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn user_cookie_round_trips() {
        let viewer = Viewer {
            id: Some(7),
            slug: Some("user/seven".to_string()),
            email: None,
            gamer_tag: Some("Seven".to_string()),
        };

        let encoded = encode_user(&viewer).unwrap();
        let jar = CookieJar::new().add(Cookie::new(USER_COOKIE, encoded));

        let decoded = session_user(&jar).unwrap();
        assert_eq!(decoded.gamer_tag.as_deref(), Some("Seven"));
        assert_eq!(decoded.id, Some(7));
    }

    #[test]
    fn empty_token_cookie_is_no_session() {
        let jar = CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, ""));
        assert!(access_token(&jar).is_none());
    }

    #[test]
    fn garbage_user_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(USER_COOKIE, "not-base64!!"));
        assert!(session_user(&jar).is_none());
    }
}
