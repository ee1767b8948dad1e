//! Member API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, MemberProfile};

use crate::core::ServerState;
use crate::directory::service;
use crate::utils::{ApiResponse, AppResult, ok};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub department_id: Option<i64>,
}

/// Search members by name, job description or email
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Employee>>>> {
    let members =
        service::search_members(state.store(), query.q.as_deref(), query.department_id).await?;
    Ok(ok(members))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<MemberProfile>>> {
    let profile = service::member_profile(state.store(), id).await?;
    Ok(ok(profile))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let employee = service::create_member(state.store(), payload).await?;
    Ok(ok(employee))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let employee = service::update_member(state.store(), id, payload).await?;
    Ok(ok(employee))
}

/// Delete a member; its direct reports move up to its manager
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let deleted = service::delete_member(state.store(), id).await?;
    Ok(ok(deleted))
}

pub async fn reports(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Employee>>>> {
    let reports = service::direct_reports(state.store(), id).await?;
    Ok(ok(reports))
}
