pub mod admin;
pub mod auth;
pub mod builds;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /master-data                 master lists snapshot (public)
///
/// /builds                      enriched catalog, ?q=&element= (public)
/// /builds/{id}                 enriched build (public)
/// /builds/{id}/raw             build with raw child rows (admin)
///
/// /auth/session                verified caller identity (auth required)
///
/// /admin/builds                create (admin)
/// /admin/builds/{id}           update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/master-data", get(handlers::master_data::get_snapshot))
        .nest("/builds", builds::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
