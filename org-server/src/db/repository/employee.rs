//! Employee Repository

use super::{RepoError, RepoResult};
use shared::models::{DEFAULT_MANAGEMENT_CATEGORY, Employee, EmployeeCreate, EmployeeUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const EMPLOYEE_SELECT: &str = "SELECT id, firstname, lastname, gender, start_date, birthday, job_description, management_category, service_assignment_code, professional_email, phone_number, image_url, department_id, location_id, manager_id, created_at, updated_at FROM employee";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} ORDER BY id");
    let rows = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn insert(conn: &mut SqliteConnection, data: &EmployeeCreate, now: i64) -> RepoResult<i64> {
    let management_category = data
        .management_category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_MANAGEMENT_CATEGORY);
    let code = data.service_assignment_code.as_deref().unwrap_or_default();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO employee (firstname, lastname, gender, start_date, birthday, job_description, management_category, service_assignment_code, professional_email, phone_number, image_url, department_id, location_id, manager_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15) RETURNING id",
    )
    .bind(&data.firstname)
    .bind(&data.lastname)
    .bind(&data.gender)
    .bind(&data.start_date)
    .bind(&data.birthday)
    .bind(&data.job_description)
    .bind(management_category)
    .bind(code)
    .bind(data.professional_email.trim())
    .bind(&data.phone_number)
    .bind(&data.image_url)
    .bind(data.department_id)
    .bind(data.location_id)
    .bind(data.manager_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let id = {
        let mut conn = pool.acquire().await?;
        insert(&mut conn, &data, now).await?
    };
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Insert a batch in one transaction: either every row is created or none is.
pub async fn create_many(pool: &SqlitePool, data: &[EmployeeCreate]) -> RepoResult<Vec<Employee>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(data.len());
    for payload in data {
        ids.push(insert(&mut tx, payload, now).await?);
    }
    tx.commit().await?;

    let mut created = Vec::with_capacity(ids.len());
    for id in ids {
        let employee = find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Employee {id} missing after insert")))?;
        created.push(employee);
    }
    Ok(created)
}

pub async fn update(pool: &SqlitePool, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET firstname = COALESCE(?1, firstname), lastname = COALESCE(?2, lastname), gender = COALESCE(?3, gender), start_date = COALESCE(?4, start_date), birthday = COALESCE(?5, birthday), job_description = COALESCE(?6, job_description), management_category = COALESCE(?7, management_category), service_assignment_code = COALESCE(?8, service_assignment_code), professional_email = COALESCE(?9, professional_email), phone_number = COALESCE(?10, phone_number), image_url = COALESCE(?11, image_url), department_id = CASE WHEN ?12 THEN ?13 ELSE department_id END, location_id = CASE WHEN ?14 THEN ?15 ELSE location_id END, manager_id = CASE WHEN ?16 THEN ?17 ELSE manager_id END, updated_at = ?18 WHERE id = ?19",
    )
    .bind(&data.firstname)
    .bind(&data.lastname)
    .bind(&data.gender)
    .bind(&data.start_date)
    .bind(&data.birthday)
    .bind(&data.job_description)
    .bind(&data.management_category)
    .bind(&data.service_assignment_code)
    .bind(&data.professional_email)
    .bind(&data.phone_number)
    .bind(&data.image_url)
    .bind(data.department_id.is_some())
    .bind(data.department_id.flatten())
    .bind(data.location_id.is_some())
    .bind(data.location_id.flatten())
    .bind(data.manager_id.is_some())
    .bind(data.manager_id.flatten())
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Hard delete, returns the removed record
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<Employee> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
    sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(existing)
}
