//! Public build catalog routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::builds;
use crate::state::AppState;

/// Routes mounted at `/builds`.
///
/// ```text
/// GET /            -> list
/// GET /{id}        -> get_by_id
/// GET /{id}/raw    -> get_raw (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(builds::list))
        .route("/{id}", get(builds::get_by_id))
        .route("/{id}/raw", get(builds::get_raw))
}
