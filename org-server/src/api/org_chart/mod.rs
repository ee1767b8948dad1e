//! Org chart API
//!
//! `GET /api/org-chart?departments=1,2` returns the reporting forest,
//! restricted to the listed departments when the parameter is present.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use shared::models::HierarchyNode;

use crate::core::ServerState;
use crate::directory::service;
use crate::utils::{ApiResponse, AppError, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/org-chart", get(org_chart))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrgChartQuery {
    /// Comma separated department ids
    pub departments: Option<String>,
}

fn parse_departments(raw: Option<&str>) -> AppResult<HashSet<i64>> {
    let Some(raw) = raw else {
        return Ok(HashSet::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                AppError::validation(format!("Invalid department id '{s}'"))
                    .with_detail("field", "departments")
            })
        })
        .collect()
}

async fn org_chart(
    State(state): State<ServerState>,
    Query(query): Query<OrgChartQuery>,
) -> AppResult<Json<ApiResponse<Vec<HierarchyNode>>>> {
    let departments = parse_departments(query.departments.as_deref())?;
    let forest = service::org_chart(state.store(), &departments).await?;
    Ok(ok(forest))
}
