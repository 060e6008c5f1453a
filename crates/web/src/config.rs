use anyhow::{Context, Result};

use crate::error::WebError;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub startgg_client_id: Option<String>,
    pub startgg_client_secret: Option<String>,
    pub startgg_redirect_uri: Option<String>,
    pub startgg_oauth_scope: String,
    /// Mark auth cookies `Secure`; off for local development.
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            startgg_client_id: std::env::var("STARTGG_CLIENT_ID").ok(),
            startgg_client_secret: std::env::var("STARTGG_CLIENT_SECRET").ok(),
            startgg_redirect_uri: std::env::var("STARTGG_REDIRECT_URI").ok(),
            startgg_oauth_scope: std::env::var("STARTGG_OAUTH_SCOPE")
                .unwrap_or_else(|_| "identity tournaments:read".to_string()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    pub fn require_client_id(&self) -> Result<&str, WebError> {
        self.startgg_client_id
            .as_deref()
            .ok_or_else(|| WebError::MissingConfiguration("STARTGG_CLIENT_ID".to_string()))
    }

    pub fn require_client_secret(&self) -> Result<&str, WebError> {
        self.startgg_client_secret
            .as_deref()
            .ok_or_else(|| WebError::MissingConfiguration("STARTGG_CLIENT_SECRET".to_string()))
    }

    pub fn require_redirect_uri(&self) -> Result<&str, WebError> {
        self.startgg_redirect_uri
            .as_deref()
            .ok_or_else(|| WebError::MissingConfiguration("STARTGG_REDIRECT_URI".to_string()))
    }
}
