//! Department API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Department, DepartmentCreate, DepartmentUpdate};

use crate::core::ServerState;
use crate::db::repository::{RepoError, department};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok};

fn map_err(id: Option<i64>, err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::DepartmentNameExists, msg),
        RepoError::NotFound(msg) => match id {
            Some(id) => AppError::department_not_found(id),
            None => AppError::with_message(ErrorCode::DepartmentNotFound, msg),
        },
        other => other.into(),
    }
}

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Department>>>> {
    let departments = department::find_all(&state.pool).await?;
    Ok(ok(departments))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DepartmentCreate>,
) -> AppResult<Json<ApiResponse<Department>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let created = department::create(&state.pool, payload)
        .await
        .map_err(|e| map_err(None, e))?;
    tracing::info!(id = created.id, name = %created.name, "Department created");
    Ok(ok(created))
}

/// Rename a department
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentUpdate>,
) -> AppResult<Json<ApiResponse<Department>>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let updated = department::update(&state.pool, id, payload)
        .await
        .map_err(|e| map_err(Some(id), e))?;
    Ok(ok(updated))
}

/// Members of the department keep their record with the department cleared
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    if !department::delete(&state.pool, id).await? {
        return Err(AppError::department_not_found(id));
    }
    tracing::info!(id, "Department deleted");
    Ok(ok(true))
}
