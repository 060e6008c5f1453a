use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::handlers::{check_in, import_roster, list_participants, stream_participants};
use crate::middleware::auth::require_session;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/import", post(import_roster))
        .route("/:participant_id/checkin", post(check_in))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .route("/", get(list_participants))
        .route("/stream", get(stream_participants))
        .merge(protected)
}
