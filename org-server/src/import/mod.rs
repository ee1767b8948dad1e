//! CSV import
//!
//! Three phases:
//! 1. [`parser`] turns the text into validated creation payloads plus
//!    deferred manager references.
//! 2. All payloads are created in one batch, without any manager link.
//! 3. [`linkage`] resolves every deferred reference against the directory
//!    and the rows just created, then applies the links concurrently.
//!
//! # Interrupted imports
//!
//! Phase 2 commits before phase 3 starts. If the request is dropped in
//! between, the new employees stay in the directory without managers.
//! Re-running the import would duplicate them; run [`CsvReconciler::relink`]
//! with the same file instead, which only re-applies the manager links.

pub mod linkage;
pub mod parser;

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use shared::models::{Employee, EmployeeUpdate, ImportSummary, LinkSummary};

use crate::directory::DirectoryStore;
use crate::utils::AppResult;
use linkage::{DeferredRelation, KeyIndex, LinkState, ManagerMap, UnresolvedReason};
use parser::{ParsedCsv, ReferenceCatalog};

pub use parser::{ImportError, RowError};

/// Two-phase CSV importer over a [`DirectoryStore`]
#[derive(Clone)]
pub struct CsvReconciler {
    store: Arc<dyn DirectoryStore>,
}

impl CsvReconciler {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    async fn parse(&self, text: &str) -> AppResult<ParsedCsv> {
        let departments = self.store.list_departments().await?;
        let locations = self.store.list_locations().await?;
        let catalog = ReferenceCatalog::new(&departments, &locations);

        let stamp = shared::util::now_millis();
        let parsed = parser::parse(text, &catalog, |n| format!("IMPORT-{stamp}-{n:04}"))?;
        for error in &parsed.errors {
            tracing::warn!(%error, "Skipping CSV row");
        }
        tracing::info!(
            delimiter = %(parsed.delimiter as char),
            valid = parsed.rows.len(),
            invalid = parsed.errors.len(),
            "CSV parsed"
        );
        Ok(parsed)
    }

    /// Import every valid row and link managers.
    ///
    /// Only a structurally unusable file or a failed batch create is an
    /// error; row problems are counted in the summary.
    pub async fn import(&self, text: &str) -> AppResult<ImportSummary> {
        let parsed = self.parse(text).await?;
        let errors = parsed.errors.len();
        let relations = deferred_relations(&parsed);
        let existing = self.store.list_employees().await?;

        let payloads = parsed.rows.into_iter().map(|r| r.payload).collect();
        let created = self.store.create_employees(payloads).await?;
        tracing::info!(created = created.len(), "Import batch created");

        // rows of this file win over existing employees on key collisions
        let mut index = KeyIndex::new();
        index.extend(&existing);
        index.extend(&created);
        let managers = ManagerMap::new(existing.iter().chain(created.iter()));

        let links = link(self.store.as_ref(), relations, &index, managers).await;
        let summary = ImportSummary {
            imported: created.len(),
            errors,
            linked: links.linked,
            unresolved: links.unresolved,
        };
        tracing::info!(
            imported = summary.imported,
            errors = summary.errors,
            linked = summary.linked,
            unresolved = summary.unresolved,
            "CSV import finished"
        );
        Ok(summary)
    }

    /// Re-apply the manager links of a file without creating anyone
    pub async fn relink(&self, text: &str) -> AppResult<LinkSummary> {
        let parsed = self.parse(text).await?;
        let relations = deferred_relations(&parsed);
        let existing: Vec<Employee> = self.store.list_employees().await?;

        let mut index = KeyIndex::new();
        index.extend(&existing);
        let managers = ManagerMap::new(&existing);

        let summary = link(self.store.as_ref(), relations, &index, managers).await;
        tracing::info!(
            linked = summary.linked,
            unresolved = summary.unresolved,
            "CSV relink finished"
        );
        Ok(summary)
    }
}

fn deferred_relations(parsed: &ParsedCsv) -> Vec<DeferredRelation> {
    parsed
        .rows
        .iter()
        .filter_map(|row| {
            let manager = row.manager.clone()?;
            Some(DeferredRelation::new(
                row.line,
                row.payload.professional_email.clone(),
                manager,
            ))
        })
        .collect()
}

/// Phase 3: resolve, guard against cycles, then apply the accepted updates together.
///
/// Each subordinate takes its manager from the first row naming it. A failed
/// update is rolled back in `managers`; links refused as cycles in that round
/// are then checked again against the rolled-back graph.
async fn link(
    store: &dyn DirectoryStore,
    mut relations: Vec<DeferredRelation>,
    index: &KeyIndex,
    mut managers: ManagerMap,
) -> LinkSummary {
    let mut claimed: HashMap<i64, u64> = HashMap::new();
    for relation in relations.iter_mut() {
        relation.resolve(index);
        let Some((subordinate_id, _)) = relation.resolved() else {
            continue;
        };
        match claimed.get(&subordinate_id) {
            Some(&first_line) => relation.reject(UnresolvedReason::DuplicateSubordinate(first_line)),
            None => {
                claimed.insert(subordinate_id, relation.line);
            }
        }
    }

    let mut candidates: Vec<usize> = (0..relations.len()).collect();
    while !candidates.is_empty() {
        // (relation, manager before the update)
        let mut updates: Vec<(usize, Option<i64>)> = Vec::new();
        let mut refused: Vec<usize> = Vec::new();
        for &i in &candidates {
            let relation = &mut relations[i];
            let Some((subordinate_id, manager_id)) = relation.resolved() else {
                continue;
            };
            let previous = managers.manager_of(subordinate_id);
            if previous == Some(manager_id) {
                tracing::debug!(line = relation.line, subordinate_id, manager_id, "Already linked");
                continue;
            }
            if managers.creates_cycle(subordinate_id, manager_id) {
                relation.reject(UnresolvedReason::WouldCreateCycle(manager_id));
                refused.push(i);
                continue;
            }
            managers.set(subordinate_id, Some(manager_id));
            updates.push((i, previous));
        }

        let results = join_all(updates.iter().filter_map(|&(i, _)| {
            let (subordinate_id, manager_id) = relations[i].resolved()?;
            Some(store.update_employee(subordinate_id, EmployeeUpdate::manager(Some(manager_id))))
        }))
        .await;

        let mut rolled_back = false;
        for (&(i, previous), result) in updates.iter().zip(results) {
            let Err(e) = result else { continue };
            if let Some((subordinate_id, _)) = relations[i].resolved() {
                managers.set(subordinate_id, previous);
            }
            relations[i].reject(UnresolvedReason::UpdateFailed(e.to_string()));
            rolled_back = true;
        }
        if !rolled_back {
            break;
        }
        for &i in &refused {
            relations[i].reconsider(index);
        }
        candidates = refused;
    }

    let mut summary = LinkSummary::default();
    for relation in &relations {
        match &relation.state {
            LinkState::Resolved {
                subordinate_id,
                manager_id,
            } => {
                tracing::debug!(line = relation.line, subordinate_id, manager_id, "Manager linked");
                summary.linked += 1;
            }
            LinkState::Unresolved(reason) => {
                tracing::warn!(
                    line = relation.line,
                    subordinate = %relation.subordinate_email,
                    %reason,
                    "Manager link skipped"
                );
                summary.unresolved += 1;
            }
            LinkState::Pending => {}
        }
    }
    summary
}
