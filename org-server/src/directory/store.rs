//! Persistence collaborator
//!
//! The hierarchy and import logic only see this trait. `SqliteStore` is the
//! production implementation; tests wrap it to inject failures.

use async_trait::async_trait;
use shared::models::{Department, Employee, EmployeeCreate, EmployeeUpdate, Location};
use sqlx::SqlitePool;

use crate::db::repository::{department, employee, location};
use crate::utils::result::StoreResult;

#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    async fn get_employee(&self, id: i64) -> StoreResult<Option<Employee>>;

    async fn create_employee(&self, payload: EmployeeCreate) -> StoreResult<Employee>;

    /// All-or-nothing: a failure leaves no row of the batch behind.
    async fn create_employees(&self, payloads: Vec<EmployeeCreate>) -> StoreResult<Vec<Employee>>;

    /// Fails with `RepoError::NotFound` when `id` does not exist.
    async fn update_employee(&self, id: i64, patch: EmployeeUpdate) -> StoreResult<Employee>;

    async fn delete_employee(&self, id: i64) -> StoreResult<Employee>;

    async fn list_departments(&self) -> StoreResult<Vec<Department>>;

    async fn list_locations(&self) -> StoreResult<Vec<Location>>;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for SqliteStore {
    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        employee::find_all(&self.pool).await
    }

    async fn get_employee(&self, id: i64) -> StoreResult<Option<Employee>> {
        employee::find_by_id(&self.pool, id).await
    }

    async fn create_employee(&self, payload: EmployeeCreate) -> StoreResult<Employee> {
        employee::create(&self.pool, payload).await
    }

    async fn create_employees(&self, payloads: Vec<EmployeeCreate>) -> StoreResult<Vec<Employee>> {
        employee::create_many(&self.pool, &payloads).await
    }

    async fn update_employee(&self, id: i64, patch: EmployeeUpdate) -> StoreResult<Employee> {
        employee::update(&self.pool, id, patch).await
    }

    async fn delete_employee(&self, id: i64) -> StoreResult<Employee> {
        employee::delete(&self.pool, id).await
    }

    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        department::find_all(&self.pool).await
    }

    async fn list_locations(&self) -> StoreResult<Vec<Location>> {
        location::find_all(&self.pool).await
    }
}
