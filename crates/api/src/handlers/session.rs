use axum::response::IntoResponse;
use axum::Json;
use gearlog_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

/// Identity of the current caller, used by the UI to decide which controls to show.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub user_id: DbId,
    pub is_admin: bool,
}

/// GET /api/v1/auth/session
///
/// Echo the verified identity. The admin flag here is a display hint only;
/// admin routes re-check it on every request.
pub async fn current(user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: SessionInfo {
            user_id: user.user_id,
            is_admin: user.is_admin,
        },
    }))
}
