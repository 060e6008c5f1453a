use reqwest::Url;
use serde_json::json;

use crate::error::WebError;

use super::models::{
    GraphqlResponse, TokenResponse, TournamentSummary, TournamentsData, Viewer, ViewerData,
};

const AUTHORIZE_URL: &str = "https://start.gg/oauth/authorize";
const TOKEN_URL: &str = "https://api.start.gg/oauth/token";
const GRAPHQL_URL: &str = "https://api.start.gg/gql/alpha";

const VIEWER_QUERY: &str = "query Viewer { currentUser { id slug email gamerTag } }";

const MANAGED_TOURNAMENTS_QUERY: &str = r#"
query ManagedTournaments($page: Int!, $perPage: Int!) {
  currentUser {
    id
    tournaments(query: { page: $page, perPage: $perPage }) {
      nodes {
        id
        name
        slug
        startAt
        city
        addrState
        countryCode
      }
    }
  }
}
"#;

#[derive(Debug, Clone)]
pub struct StartggClient {
    client: reqwest::Client,
    authorize_url: String,
    token_url: String,
    graphql_url: String,
}

impl StartggClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            authorize_url: AUTHORIZE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            graphql_url: GRAPHQL_URL.to_string(),
        }
    }

    /// Authorization-code flow entry point URL.
    pub fn authorize_url(
        &self,
        client_id: &str,
        redirect_uri: &str,
        scope: &str,
        state: &str,
    ) -> Result<String, WebError> {
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("scope", scope),
                ("state", state),
            ],
        )
        .map_err(|e| WebError::InternalServerError(format!("Invalid authorize URL: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> Result<TokenResponse, WebError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&params)
            .send()
            .await
            .map_err(unreachable_upstream)?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(WebError::Upstream {
                status: Some(status.as_u16()),
                details,
            });
        }

        response.json().await.map_err(unreachable_upstream)
    }

    /// Best-effort profile lookup. Degrades to `None` instead of failing the
    /// login when the provider misbehaves.
    pub async fn fetch_viewer(&self, access_token: &str) -> Option<Viewer> {
        let result = self
            .graphql::<ViewerData>(access_token, json!({ "query": VIEWER_QUERY }))
            .await;

        match result {
            Ok(data) => data.current_user,
            Err(e) => {
                tracing::debug!("Viewer lookup failed, continuing without profile: {}", e);
                None
            }
        }
    }

    /// Tournaments managed by the authenticated user.
    pub async fn managed_tournaments(
        &self,
        access_token: &str,
    ) -> Result<Vec<TournamentSummary>, WebError> {
        let payload = json!({
            "query": MANAGED_TOURNAMENTS_QUERY,
            "variables": { "page": 1, "perPage": 50 },
        });

        let data = self.graphql::<TournamentsData>(access_token, payload).await?;

        Ok(data
            .current_user
            .and_then(|user| user.tournaments)
            .map(|t| t.nodes)
            .unwrap_or_default())
    }

    async fn graphql<T: serde::de::DeserializeOwned>(
        &self,
        access_token: &str,
        payload: serde_json::Value,
    ) -> Result<T, WebError> {
        let response = self
            .client
            .post(&self.graphql_url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(unreachable_upstream)?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            return Err(WebError::Upstream {
                status: Some(status.as_u16()),
                details,
            });
        }

        let body: GraphqlResponse<T> = response.json().await.map_err(unreachable_upstream)?;

        if !body.errors.is_empty() {
            return Err(WebError::Upstream {
                status: Some(status.as_u16()),
                details: serde_json::to_string(&body.errors).unwrap_or_default(),
            });
        }

        body.data.ok_or_else(|| WebError::Upstream {
            status: Some(status.as_u16()),
            details: "GraphQL response had no data".to_string(),
        })
    }
}

impl Default for StartggClient {
    fn default() -> Self {
        Self::new()
    }
}

fn unreachable_upstream(error: reqwest::Error) -> WebError {
    WebError::Upstream {
        status: error.status().map(|s| s.as_u16()),
        details: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_encodes_parameters() {
        let client = StartggClient::new();
        let url = client
            .authorize_url(
                "client-123",
                "http://localhost:3000/api/auth/callback",
                "identity tournaments:read",
                "abc123",
            )
            .unwrap();

        assert!(url.starts_with("https://start.gg/oauth/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fapi%2Fauth%2Fcallback"));
        assert!(url.contains("scope=identity+tournaments%3Aread"));
    }
}
