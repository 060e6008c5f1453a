use axum::{Router, routing::post};

use super::handlers::scan;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/scan", post(scan))
}
