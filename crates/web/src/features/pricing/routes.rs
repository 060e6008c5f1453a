use axum::{
    Router, middleware,
    routing::{get, put},
};

use super::handlers::{get_pricing, update_pricing};
use crate::middleware::auth::require_session;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", put(update_pricing))
        .route_layer(middleware::from_fn(require_session));

    Router::new().route("/", get(get_pricing)).merge(protected)
}
