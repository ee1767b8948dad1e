//! Location API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Location, LocationCreate, LocationUpdate};

use crate::core::ServerState;
use crate::db::repository::{RepoError, location};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Location>>>> {
    Ok(ok(location::find_all(&state.pool).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LocationCreate>,
) -> AppResult<Json<ApiResponse<Location>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = location::create(&state.pool, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::LocationNameExists, msg),
            other => other.into(),
        })?;
    tracing::info!(id = created.id, name = %created.name, "Location created");
    Ok(ok(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<LocationUpdate>,
) -> AppResult<Json<ApiResponse<Location>>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let updated = location::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::LocationNameExists, msg),
            RepoError::NotFound(_) => AppError::location_not_found(id),
            other => other.into(),
        })?;
    Ok(ok(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    if !location::delete(&state.pool, id).await? {
        return Err(AppError::location_not_found(id));
    }
    tracing::info!(id, "Location deleted");
    Ok(ok(true))
}
