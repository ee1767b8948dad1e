//! Location Repository

use super::{RepoError, RepoResult};
use shared::models::{Location, LocationCreate, LocationUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Location>> {
    let rows = sqlx::query_as::<_, Location>(
        "SELECT id, name, created_at, updated_at FROM location ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Location>> {
    let row = sqlx::query_as::<_, Location>(
        "SELECT id, name, created_at, updated_at FROM location WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Location>> {
    let row = sqlx::query_as::<_, Location>(
        "SELECT id, name, created_at, updated_at FROM location WHERE name = ? COLLATE NOCASE LIMIT 1",
    )
    .bind(name.trim())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: LocationCreate) -> RepoResult<Location> {
    let name = data.name.trim();
    if find_by_name(pool, name).await?.is_some() {
        return Err(RepoError::Duplicate(format!("Location '{name}' already exists")));
    }
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO location (name, created_at, updated_at) VALUES (?1, ?2, ?2) RETURNING id",
    )
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create location".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: LocationUpdate) -> RepoResult<Location> {
    let name = data.name.as_deref().map(str::trim);
    if let Some(name) = name
        && let Some(other) = find_by_name(pool, name).await?
        && other.id != id
    {
        return Err(RepoError::Duplicate(format!("Location '{name}' already exists")));
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE location SET name = COALESCE(?1, name), updated_at = ?2 WHERE id = ?3",
    )
    .bind(name)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Location {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Location {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM location WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
