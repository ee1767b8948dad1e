//! Deferred manager links (phase 3)
//!
//! A row names its manager by email or by service assignment code. Those keys
//! only map to ids once the rows exist, so every link starts `Pending` and is
//! settled exactly once into `Resolved` or `Unresolved`.

use std::collections::HashMap;

use shared::models::Employee;
use thiserror::Error;

/// How a row points at its manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerRef {
    Email(String),
    Code(String),
}

impl std::fmt::Display for ManagerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManagerRef::Email(v) => write!(f, "email '{v}'"),
            ManagerRef::Code(v) => write!(f, "code '{v}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedReason {
    #[error("no employee with email '{0}'")]
    UnknownSubordinate(String),

    #[error("no manager with {0}")]
    UnknownManager(ManagerRef),

    #[error("employee would manage itself")]
    SelfReference,

    #[error("manager {0} already reports to this employee")]
    WouldCreateCycle(i64),

    #[error("line {0} already sets this employee's manager")]
    DuplicateSubordinate(u64),

    #[error("update failed: {0}")]
    UpdateFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Pending,
    Resolved { subordinate_id: i64, manager_id: i64 },
    Unresolved(UnresolvedReason),
}

/// A manager link captured while parsing, settled after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredRelation {
    pub line: u64,
    pub subordinate_email: String,
    pub manager: ManagerRef,
    pub state: LinkState,
}

impl DeferredRelation {
    pub fn new(line: u64, subordinate_email: impl Into<String>, manager: ManagerRef) -> Self {
        Self {
            line,
            subordinate_email: subordinate_email.into(),
            manager,
            state: LinkState::Pending,
        }
    }

    /// `Pending → Resolved | Unresolved`; settled relations are left alone
    pub fn resolve(&mut self, index: &KeyIndex) {
        if self.state != LinkState::Pending {
            return;
        }
        let Some(subordinate_id) = index.email(&self.subordinate_email) else {
            self.state = LinkState::Unresolved(UnresolvedReason::UnknownSubordinate(
                self.subordinate_email.clone(),
            ));
            return;
        };
        let manager_id = match &self.manager {
            ManagerRef::Email(email) => index.email(email),
            ManagerRef::Code(code) => index.code(code),
        };
        self.state = match manager_id {
            None => LinkState::Unresolved(UnresolvedReason::UnknownManager(self.manager.clone())),
            Some(m) if m == subordinate_id => LinkState::Unresolved(UnresolvedReason::SelfReference),
            Some(manager_id) => LinkState::Resolved {
                subordinate_id,
                manager_id,
            },
        };
    }

    /// A resolved link that could not be applied
    pub fn reject(&mut self, reason: UnresolvedReason) {
        self.state = LinkState::Unresolved(reason);
    }

    /// Give a link refused as a cycle another chance once the graph changed.
    /// Any other state is kept.
    pub fn reconsider(&mut self, index: &KeyIndex) {
        if matches!(
            self.state,
            LinkState::Unresolved(UnresolvedReason::WouldCreateCycle(_))
        ) {
            self.state = LinkState::Pending;
            self.resolve(index);
        }
    }

    pub fn resolved(&self) -> Option<(i64, i64)> {
        match self.state {
            LinkState::Resolved {
                subordinate_id,
                manager_id,
            } => Some((subordinate_id, manager_id)),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.state, LinkState::Unresolved(_))
    }
}

/// Email and service-assignment-code lookups to employee ids.
///
/// Later inserts win, so build it from existing employees first and then
/// the rows of the current import.
#[derive(Debug, Default)]
pub struct KeyIndex {
    by_email: HashMap<String, i64>,
    by_code: HashMap<String, i64>,
    by_compact_code: HashMap<String, i64>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn compact(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, employee: &Employee) {
        let email = email_key(&employee.professional_email);
        if !email.is_empty() {
            self.by_email.insert(email, employee.id);
        }
        let code = employee.service_assignment_code.trim();
        if !code.is_empty() {
            self.by_code.insert(code.to_string(), employee.id);
            self.by_compact_code.insert(compact(code), employee.id);
        }
    }

    pub fn extend<'a>(&mut self, employees: impl IntoIterator<Item = &'a Employee>) {
        for e in employees {
            self.insert(e);
        }
    }

    pub fn email(&self, email: &str) -> Option<i64> {
        self.by_email.get(&email_key(email)).copied()
    }

    /// Exact (trimmed) match first, then with all whitespace removed
    pub fn code(&self, code: &str) -> Option<i64> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.by_code
            .get(code)
            .or_else(|| self.by_compact_code.get(&compact(code)))
            .copied()
    }
}

/// Current `manager_id` of every employee, updated as links are accepted
pub struct ManagerMap(HashMap<i64, Option<i64>>);

impl ManagerMap {
    pub fn new<'a>(employees: impl IntoIterator<Item = &'a Employee>) -> Self {
        Self(employees.into_iter().map(|e| (e.id, e.manager_id)).collect())
    }

    pub fn manager_of(&self, id: i64) -> Option<i64> {
        self.0.get(&id).copied().flatten()
    }

    /// Would `manager_id` end up below `subordinate_id`?
    pub fn creates_cycle(&self, subordinate_id: i64, manager_id: i64) -> bool {
        let mut current = Some(manager_id);
        let mut steps = 0usize;
        while let Some(id) = current {
            if id == subordinate_id {
                return true;
            }
            steps += 1;
            if steps > self.0.len() {
                // already looping without us
                return false;
            }
            current = self.manager_of(id);
        }
        false
    }

    pub fn set(&mut self, id: i64, manager_id: Option<i64>) {
        self.0.insert(id, manager_id);
    }
}
