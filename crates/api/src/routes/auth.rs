use axum::routing::get;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET /session    -> current (auth required)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/session", get(session::current))
}
