//! Handler for the master reference lists used to populate the admin form.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use gearlog_db::repositories::MasterDataRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/master-data
///
/// Fresh snapshot of every master list. Fails as a whole if any list fails.
pub async fn get_snapshot(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let snapshot = MasterDataRepo::load_snapshot(&state.pool).await?;
    Ok(Json(DataResponse { data: snapshot }))
}
