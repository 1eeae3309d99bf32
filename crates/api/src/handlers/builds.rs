//! Handlers for the build catalog (public, enriched) and build
//! administration (admin only, raw rows).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gearlog_core::catalog::CatalogFilter;
use gearlog_core::enrichment::{enrich, EnrichedBuild};
use gearlog_core::error::CoreError;
use gearlog_core::master_data::LookupMaps;
use gearlog_core::payload;
use gearlog_core::types::DbId;
use gearlog_db::models::build::BuildPayload;
use gearlog_db::repositories::{BuildRepo, MasterDataRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Build", id })
}

// ---------------------------------------------------------------------------
// Public catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/builds?q=&element=
///
/// Every build enriched against one master data snapshot, then filtered.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> AppResult<impl IntoResponse> {
    let (master, builds) = tokio::try_join!(
        async {
            MasterDataRepo::load_snapshot(&state.pool)
                .await
                .map_err(AppError::from)
        },
        async {
            BuildRepo::list_with_children(&state.pool)
                .await
                .map_err(AppError::from)
        },
    )?;

    let maps = LookupMaps::from_snapshot(&master);
    let enriched: Vec<EnrichedBuild> = builds
        .iter()
        .map(|b| enrich(&b.to_source(), &maps))
        .collect();

    Ok(Json(DataResponse {
        data: filter.apply(enriched),
    }))
}

/// GET /api/v1/builds/{id}
///
/// A single enriched build.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (master, source) = tokio::try_join!(
        async {
            MasterDataRepo::load_snapshot(&state.pool)
                .await
                .map_err(AppError::from)
        },
        async {
            BuildRepo::load_source(&state.pool, id)
                .await
                .map_err(AppError::from)
        },
    )?;
    let source = source.ok_or_else(|| not_found(id))?;

    let maps = LookupMaps::from_snapshot(&master);
    Ok(Json(DataResponse {
        data: enrich(&source, &maps),
    }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/builds/{id}/raw
///
/// Build row plus its child rows, unresolved, for pre-filling the edit form.
pub async fn get_raw(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let build = BuildRepo::find_with_children(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: build }))
}

/// POST /api/v1/admin/builds
///
/// Create a build with its gear, cradle and ability assignments.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<BuildPayload>,
) -> AppResult<impl IntoResponse> {
    let input = payload::prepare(input)?;
    let build = BuildRepo::create(&state.pool, &input).await?;

    tracing::info!(
        build_id = %build.id,
        user_id = %admin.user_id,
        gear = input.gear_items.len(),
        cradle = input.cradle_items.len(),
        abilities = input.abilities.len(),
        "Build created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: build })))
}

/// PUT /api/v1/admin/builds/{id}
///
/// Replace a build's fields and all of its child rows.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BuildPayload>,
) -> AppResult<impl IntoResponse> {
    let input = payload::prepare(input)?;
    let build = BuildRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(build_id = %id, user_id = %admin.user_id, "Build updated");

    Ok(Json(DataResponse { data: build }))
}

/// DELETE /api/v1/admin/builds/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = BuildRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(build_id = %id, user_id = %admin.user_id, "Build deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
