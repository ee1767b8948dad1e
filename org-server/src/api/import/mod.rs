//! CSV import API
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/import/csv | POST | two-phase import, returns `ImportSummary` |
//! | /api/import/csv/relink | POST | re-apply manager links only, returns `LinkSummary` |
//!
//! The body is the raw CSV text, capped at `MAX_IMPORT_BYTES`.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    routing::post,
};
use shared::models::{ImportSummary, LinkSummary};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/import/csv", post(import_csv))
        .route("/api/import/csv/relink", post(relink_csv))
}

async fn read_csv(body: Body, limit: usize) -> AppResult<String> {
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|_| {
        AppError::with_message(
            ErrorCode::ImportTooLarge,
            format!("CSV body exceeds {limit} bytes"),
        )
        .with_detail("max_bytes", limit)
    })?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| AppError::with_message(ErrorCode::InvalidFormat, "CSV body is not valid UTF-8"))
}

async fn import_csv(
    State(state): State<ServerState>,
    body: Body,
) -> AppResult<Json<ApiResponse<ImportSummary>>> {
    let text = read_csv(body, state.config.max_import_bytes).await?;
    let summary = state.importer.import(&text).await?;
    let message = format!(
        "Imported {} rows, skipped {}",
        summary.imported, summary.errors
    );
    Ok(ok_with_message(summary, message))
}

async fn relink_csv(
    State(state): State<ServerState>,
    body: Body,
) -> AppResult<Json<ApiResponse<LinkSummary>>> {
    let text = read_csv(body, state.config.max_import_bytes).await?;
    let summary = state.importer.relink(&text).await?;
    Ok(ok(summary))
}
