//! Org chart Model
//!
//! Derived from the employee collection on demand, never persisted.

use serde::{Deserialize, Serialize};

use super::employee::Employee;

/// One employee in the org chart together with its direct reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub employee: Employee,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn id(&self) -> i64 {
        self.employee.id
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }

    /// Longest root-to-leaf path, counted in nodes
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// `(manager, report)` pairs of this subtree in pre-order
    pub fn edges(&self) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        let mut stack: Vec<(&HierarchyNode, &HierarchyNode)> =
            self.children.iter().rev().map(|c| (self, c)).collect();
        while let Some((manager, report)) = stack.pop() {
            out.push((manager.id(), report.id()));
            // reversed so the first report is expanded first
            stack.extend(report.children.iter().rev().map(|c| (report, c)));
        }
        out
    }
}

/// Total node count across a forest
pub fn forest_size(forest: &[HierarchyNode]) -> usize {
    forest.iter().map(HierarchyNode::size).sum()
}
