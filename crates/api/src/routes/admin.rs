//! Admin write routes. Every handler requires `RequireAdmin`.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::builds;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /builds         -> create
/// PUT    /builds/{id}    -> update
/// DELETE /builds/{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/builds", post(builds::create))
        .route("/builds/{id}", put(builds::update).delete(builds::delete))
}
