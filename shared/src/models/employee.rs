//! Employee Model

use serde::{Deserialize, Serialize};

use super::serde_helpers::double_option;

/// Management category applied when none is provided
pub const DEFAULT_MANAGEMENT_CATEGORY: &str = "Individual Contributor";

/// Employee entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    pub job_description: String,
    pub management_category: String,
    /// External identifier, only used as a join key during bulk import
    pub service_assignment_code: String,
    pub professional_email: String,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub department_id: Option<i64>,
    pub location_id: Option<i64>,
    /// Direct manager; `None` for top-level employees
    pub manager_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Employee with the "reports to" breadcrumb and direct reports (profile page)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    #[serde(flatten)]
    pub employee: Employee,
    /// Nearest manager first
    pub managers: Vec<Employee>,
    pub reports: Vec<Employee>,
}

/// Create employee payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub firstname: String,
    pub lastname: String,
    pub gender: Option<String>,
    pub start_date: Option<String>,
    pub birthday: Option<String>,
    pub job_description: String,
    pub management_category: Option<String>,
    pub service_assignment_code: Option<String>,
    pub professional_email: String,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    pub department_id: Option<i64>,
    pub location_id: Option<i64>,
    pub manager_id: Option<i64>,
}

/// Update employee payload
///
/// Reference fields are tri-state: absent keeps the current value,
/// `null` clears it, a number sets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub gender: Option<String>,
    pub start_date: Option<String>,
    pub birthday: Option<String>,
    pub job_description: Option<String>,
    pub management_category: Option<String>,
    pub service_assignment_code: Option<String>,
    pub professional_email: Option<String>,
    pub phone_number: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Option<i64>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Option<i64>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<Option<i64>>,
}

impl EmployeeUpdate {
    /// Patch that only moves the employee under a new manager (or to the top level)
    pub fn manager(manager_id: Option<i64>) -> Self {
        Self {
            manager_id: Some(manager_id),
            ..Default::default()
        }
    }
}
