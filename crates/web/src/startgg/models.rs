use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// The authenticated start.gg user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub email: Option<String>,
    pub gamer_tag: Option<String>,
}

impl Viewer {
    /// Operator identity for audit notes: gamer tag, then slug, then id.
    pub fn operator_id(&self) -> Option<String> {
        self.gamer_tag
            .clone()
            .or_else(|| self.slug.clone())
            .or_else(|| self.id.map(|id| id.to_string()))
    }
}

/// A tournament managed by the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub id: i64,
    pub name: Option<String>,
    pub slug: Option<String>,
    /// Unix timestamp of the start date, as start.gg reports it.
    pub start_at: Option<i64>,
    pub city: Option<String>,
    pub addr_state: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewerData {
    pub current_user: Option<Viewer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TournamentsData {
    pub current_user: Option<TournamentsUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TournamentsUser {
    pub tournaments: Option<TournamentNodes>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TournamentNodes {
    #[serde(default)]
    pub nodes: Vec<TournamentSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_operator_id_prefers_gamer_tag() {
        let viewer = Viewer {
            id: Some(42),
            slug: Some("user/abc".to_string()),
            email: None,
            gamer_tag: Some("Skyline".to_string()),
        };
        assert_eq!(viewer.operator_id().as_deref(), Some("Skyline"));

        let no_tag = Viewer {
            gamer_tag: None,
            ..viewer.clone()
        };
        assert_eq!(no_tag.operator_id().as_deref(), Some("user/abc"));

        let id_only = Viewer {
            slug: None,
            gamer_tag: None,
            ..viewer
        };
        assert_eq!(id_only.operator_id().as_deref(), Some("42"));
    }

    #[test]
    fn tournament_nodes_parse_from_graphql_shape() {
        let body = serde_json::json!({
            "data": {
                "currentUser": {
                    "id": 1,
                    "tournaments": {
                        "nodes": [
                            {
                                "id": 9000,
                                "name": "Weekly #12",
                                "slug": "tournament/weekly-12",
                                "startAt": 1717200000,
                                "city": "Tokyo",
                                "addrState": null,
                                "countryCode": "JP"
                            }
                        ]
                    }
                }
            }
        });

        let parsed: GraphqlResponse<TournamentsData> =
            serde_json::from_value(body).unwrap();
        let nodes = parsed
            .data
            .unwrap()
            .current_user
            .unwrap()
            .tournaments
            .unwrap()
            .nodes;

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, 9000);
        assert_eq!(nodes[0].country_code.as_deref(), Some("JP"));
    }
}
