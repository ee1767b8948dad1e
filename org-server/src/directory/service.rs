//! Member operations
//!
//! Every mutation of the manager relation goes through here so the graph
//! stays acyclic and never points at a missing employee.

use std::collections::{HashMap, HashSet};

use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, HierarchyNode, MemberProfile};

use super::hierarchy;
use super::store::DirectoryStore;
use crate::utils::validation::{validate_employee_create, validate_employee_update};
use crate::utils::{AppError, AppResult};

/// Blank dates mean "no date"; valid ones are stored as `YYYY-MM-DD`
fn clean_date(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
    if let Some(v) = value.as_deref()
        && let Some(normalized) = shared::util::normalize_date(v)
    {
        *value = Some(normalized);
    }
}

async fn require_manager(store: &dyn DirectoryStore, manager_id: i64) -> AppResult<()> {
    if store.get_employee(manager_id).await?.is_none() {
        return Err(AppError::manager_not_found(manager_id));
    }
    Ok(())
}

pub async fn get_member(store: &dyn DirectoryStore, id: i64) -> AppResult<Employee> {
    store
        .get_employee(id)
        .await?
        .ok_or_else(|| AppError::employee_not_found(id))
}

/// Employee with its manager chain and direct reports
pub async fn member_profile(store: &dyn DirectoryStore, id: i64) -> AppResult<MemberProfile> {
    let employees = store.list_employees().await?;
    let employee = employees
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or_else(|| AppError::employee_not_found(id))?;
    let managers = hierarchy::manager_chain(&employees, id);
    let reports = employees
        .into_iter()
        .filter(|e| e.manager_id == Some(id))
        .collect();
    Ok(MemberProfile {
        employee,
        managers,
        reports,
    })
}

pub async fn create_member(
    store: &dyn DirectoryStore,
    mut payload: EmployeeCreate,
) -> AppResult<Employee> {
    clean_date(&mut payload.start_date);
    clean_date(&mut payload.birthday);
    validate_employee_create(&payload)?;
    if let Some(manager_id) = payload.manager_id {
        require_manager(store, manager_id).await?;
    }

    let employee = store.create_employee(payload).await?;
    tracing::info!(id = employee.id, name = %employee.full_name(), "Employee created");
    Ok(employee)
}

pub async fn update_member(
    store: &dyn DirectoryStore,
    id: i64,
    mut patch: EmployeeUpdate,
) -> AppResult<Employee> {
    clean_date(&mut patch.start_date);
    clean_date(&mut patch.birthday);
    validate_employee_update(&patch)?;

    if let Some(Some(manager_id)) = patch.manager_id {
        if manager_id == id {
            return Err(AppError::self_management(id));
        }
        let employees = store.list_employees().await?;
        if !employees.iter().any(|e| e.id == id) {
            return Err(AppError::employee_not_found(id));
        }
        if !employees.iter().any(|e| e.id == manager_id) {
            return Err(AppError::manager_not_found(manager_id));
        }
        if hierarchy::would_create_cycle(&employees, id, manager_id) {
            return Err(AppError::manager_cycle(id, manager_id));
        }
    }

    store.update_employee(id, patch).await.map_err(|e| match e {
        crate::db::repository::RepoError::NotFound(_) => AppError::employee_not_found(id),
        other => other.into(),
    })
}

/// Delete an employee, promoting its direct reports to its own manager first
pub async fn delete_member(store: &dyn DirectoryStore, id: i64) -> AppResult<Employee> {
    let employees = store.list_employees().await?;
    if !employees.iter().any(|e| e.id == id) {
        return Err(AppError::employee_not_found(id));
    }
    let before: HashMap<i64, Option<i64>> =
        employees.iter().map(|e| (e.id, e.manager_id)).collect();

    let after = hierarchy::reparent_on_delete(employees, id);
    let mut promoted = 0usize;
    for e in &after {
        if before.get(&e.id) != Some(&e.manager_id) {
            store
                .update_employee(e.id, EmployeeUpdate::manager(e.manager_id))
                .await?;
            promoted += 1;
        }
    }

    let deleted = store.delete_employee(id).await?;
    tracing::info!(
        id,
        promoted,
        new_manager = ?deleted.manager_id,
        "Employee deleted, direct reports promoted"
    );
    Ok(deleted)
}

/// Case-insensitive match on "first last", job description and email
pub async fn search_members(
    store: &dyn DirectoryStore,
    query: Option<&str>,
    department_id: Option<i64>,
) -> AppResult<Vec<Employee>> {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    let employees = store.list_employees().await?;
    Ok(employees
        .into_iter()
        .filter(|e| department_id.is_none() || e.department_id == department_id)
        .filter(|e| {
            needle.is_empty()
                || e.full_name().to_lowercase().contains(&needle)
                || e.job_description.to_lowercase().contains(&needle)
                || e.professional_email.to_lowercase().contains(&needle)
        })
        .collect())
}

pub async fn direct_reports(store: &dyn DirectoryStore, manager_id: i64) -> AppResult<Vec<Employee>> {
    let employees = store.list_employees().await?;
    if !employees.iter().any(|e| e.id == manager_id) {
        return Err(AppError::employee_not_found(manager_id));
    }
    Ok(employees
        .into_iter()
        .filter(|e| e.manager_id == Some(manager_id))
        .collect())
}

/// Org chart, optionally restricted to a set of departments
pub async fn org_chart(
    store: &dyn DirectoryStore,
    departments: &HashSet<i64>,
) -> AppResult<Vec<HierarchyNode>> {
    let employees = store.list_employees().await?;
    Ok(hierarchy::build_filtered_forest(&employees, departments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::directory::SqliteStore;
    use crate::utils::ErrorCode;

    fn payload(first: &str, manager_id: Option<i64>) -> EmployeeCreate {
        EmployeeCreate {
            firstname: first.into(),
            lastname: "Doe".into(),
            job_description: "Engineer".into(),
            professional_email: format!("{}@example.com", first.to_lowercase()),
            manager_id,
            ..Default::default()
        }
    }

    async fn store() -> SqliteStore {
        SqliteStore::new(test_pool().await)
    }

    #[tokio::test]
    async fn test_create_rejects_missing_manager() {
        let store = store().await;
        let err = create_member(&store, payload("Ada", Some(77))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ManagerNotFound);
    }

    #[tokio::test]
    async fn test_create_normalizes_dates() {
        let store = store().await;
        let mut p = payload("Ada", None);
        p.start_date = Some(" 2021-09-01 ".into());
        p.birthday = Some(String::new());
        let e = create_member(&store, p).await.unwrap();
        assert_eq!(e.start_date.as_deref(), Some("2021-09-01"));
        assert_eq!(e.birthday, None);
    }

    #[tokio::test]
    async fn test_update_rejects_cycle_and_self() {
        let store = store().await;
        let a = create_member(&store, payload("Ada", None)).await.unwrap();
        let b = create_member(&store, payload("Bob", Some(a.id))).await.unwrap();
        let c = create_member(&store, payload("Cid", Some(b.id))).await.unwrap();

        let err = update_member(&store, a.id, EmployeeUpdate::manager(Some(c.id)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ManagerCycle);

        let err = update_member(&store, a.id, EmployeeUpdate::manager(Some(a.id)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SelfManagement);

        let moved = update_member(&store, c.id, EmployeeUpdate::manager(Some(a.id)))
            .await
            .unwrap();
        assert_eq!(moved.manager_id, Some(a.id));
    }

    #[tokio::test]
    async fn test_update_missing_employee() {
        let store = store().await;
        let err = update_member(&store, 5, EmployeeUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_delete_promotes_reports() {
        let store = store().await;
        let a = create_member(&store, payload("Ada", None)).await.unwrap();
        let b = create_member(&store, payload("Bob", Some(a.id))).await.unwrap();
        let c = create_member(&store, payload("Cid", Some(b.id))).await.unwrap();
        let d = create_member(&store, payload("Dee", Some(b.id))).await.unwrap();

        let deleted = delete_member(&store, b.id).await.unwrap();
        assert_eq!(deleted.id, b.id);

        let employees = store.list_employees().await.unwrap();
        assert_eq!(employees.len(), 3);
        for id in [c.id, d.id] {
            let e = employees.iter().find(|e| e.id == id).unwrap();
            assert_eq!(e.manager_id, Some(a.id));
        }

        // deleting a root promotes its reports to the top level
        delete_member(&store, a.id).await.unwrap();
        let employees = store.list_employees().await.unwrap();
        assert!(employees.iter().all(|e| e.manager_id.is_none()));

        let err = delete_member(&store, a.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_search_reports_and_profile() {
        let store = store().await;
        let a = create_member(&store, payload("Ada", None)).await.unwrap();
        let b = create_member(&store, payload("Bob", Some(a.id))).await.unwrap();
        let mut p = payload("Cid", Some(b.id));
        p.job_description = "Designer".into();
        let c = create_member(&store, p).await.unwrap();

        let hits = search_members(&store, Some("DESIGN"), None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, c.id);
        assert_eq!(search_members(&store, None, None).await.unwrap().len(), 3);
        assert!(search_members(&store, Some("ada"), Some(4)).await.unwrap().is_empty());

        let reports = direct_reports(&store, a.id).await.unwrap();
        assert_eq!(reports.iter().map(|e| e.id).collect::<Vec<_>>(), vec![b.id]);

        let profile = member_profile(&store, c.id).await.unwrap();
        assert_eq!(
            profile.managers.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![b.id, a.id]
        );
        assert!(profile.reports.is_empty());

        let chart = org_chart(&store, &HashSet::new()).await.unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].edges(), vec![(a.id, b.id), (b.id, c.id)]);
    }
}
