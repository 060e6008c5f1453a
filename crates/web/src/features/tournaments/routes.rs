use axum::{Router, routing::get};

use super::handlers::list_tournaments;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/tournaments", get(list_tournaments))
}
