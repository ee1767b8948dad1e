//! Org chart construction
//!
//! Turns the flat employee collection into a forest keyed by `manager_id`.
//! All functions are pure: they work on a snapshot and never touch storage.
//!
//! Children are indexed once (`manager_id → positions`) and then walked, so a
//! build is O(n). Every walk carries a visited set: an employee that sits on a
//! manager cycle is never reachable from a root and is reported, not looped on.

use std::collections::{HashMap, HashSet, VecDeque};

use shared::models::{Employee, HierarchyNode, forest_size};

/// Longest reporting chain kept under one root, counted in nodes.
///
/// Reports found below this depth start a tree of their own and are logged.
pub const MAX_CHART_DEPTH: usize = 64;

/// `manager_id → indices of direct reports`, in input order
struct ChildIndex<'a> {
    employees: &'a [Employee],
    children: HashMap<Option<i64>, Vec<usize>>,
}

/// Node under construction: its employee, the next report to visit and the
/// subtrees finished so far
struct Frame {
    idx: usize,
    next: usize,
    children: Vec<HierarchyNode>,
}

impl Frame {
    fn new(idx: usize) -> Self {
        Self {
            idx,
            next: 0,
            children: Vec::new(),
        }
    }
}

impl<'a> ChildIndex<'a> {
    fn new(employees: &'a [Employee], include: impl Fn(&Employee) -> bool) -> Self {
        let mut children: HashMap<Option<i64>, Vec<usize>> = HashMap::new();
        for (idx, e) in employees.iter().enumerate() {
            if include(e) {
                children.entry(e.manager_id).or_default().push(idx);
            }
        }
        Self { employees, children }
    }

    fn reports_of(&self, manager_id: Option<i64>) -> &[usize] {
        self.children
            .get(&manager_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Post-order build of the tree rooted at `root` on an explicit stack.
    ///
    /// `root` must already be in `visited`. Reports that would sit deeper than
    /// [`MAX_CHART_DEPTH`] are marked visited and pushed to `detached`.
    fn build(
        &self,
        root: usize,
        visited: &mut HashSet<i64>,
        detached: &mut VecDeque<usize>,
    ) -> Option<HierarchyNode> {
        let mut stack = vec![Frame::new(root)];
        let mut finished = None;
        while let Some(mut frame) = stack.pop() {
            let depth = stack.len() + 1;
            let reports = self.reports_of(Some(self.employees[frame.idx].id));
            if let Some(&child) = reports.get(frame.next) {
                frame.next += 1;
                stack.push(frame);
                if visited.insert(self.employees[child].id) {
                    if depth >= MAX_CHART_DEPTH {
                        detached.push_back(child);
                    } else {
                        stack.push(Frame::new(child));
                    }
                }
                continue;
            }

            let node = HierarchyNode {
                employee: self.employees[frame.idx].clone(),
                children: frame.children,
            };
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => finished = Some(node),
            }
        }
        finished
    }

    /// Build one tree per root, then one per detached report, in that order
    fn grow(&self, roots: impl IntoIterator<Item = usize>) -> Vec<HierarchyNode> {
        let mut visited = HashSet::new();
        let mut pending: VecDeque<usize> = roots
            .into_iter()
            .filter(|&idx| visited.insert(self.employees[idx].id))
            .collect();
        let root_count = pending.len();
        let mut detached = VecDeque::new();
        let mut forest = Vec::with_capacity(root_count);

        while let Some(idx) = pending.pop_front() {
            forest.extend(self.build(idx, &mut visited, &mut detached));
            pending.append(&mut detached);
        }

        if forest.len() > root_count {
            let split: Vec<i64> = forest[root_count..].iter().map(HierarchyNode::id).collect();
            tracing::warn!(
                max_depth = MAX_CHART_DEPTH,
                split = ?split,
                "Reporting chains too deep for one tree were split at these employees"
            );
        }
        forest
    }
}

/// Build the trees hanging under `root_manager_id` (`None` = top-level employees).
pub fn build_forest(employees: &[Employee], root_manager_id: Option<i64>) -> Vec<HierarchyNode> {
    let index = ChildIndex::new(employees, |_| true);
    let forest = index.grow(index.reports_of(root_manager_id).iter().copied());

    if root_manager_id.is_none() {
        let placed = forest_size(&forest);
        if placed < employees.len() {
            let anomalies = find_anomalies(employees);
            tracing::warn!(
                total = employees.len(),
                placed,
                cyclic = ?anomalies.cyclic,
                dangling = ?anomalies.dangling,
                "Employees unreachable from any root were left out of the org chart"
            );
        }
    }
    forest
}

/// Forest restricted to the selected departments.
///
/// A member is a root when it has no manager or its manager is not a member.
/// Included employees below an excluded manager become roots of their own; they
/// are never reattached to an included grandparent. An empty selection is the
/// full forest.
pub fn build_filtered_forest(
    employees: &[Employee],
    selected_department_ids: &HashSet<i64>,
) -> Vec<HierarchyNode> {
    if selected_department_ids.is_empty() {
        return build_forest(employees, None);
    }

    let is_member = |e: &Employee| {
        e.department_id
            .is_some_and(|d| selected_department_ids.contains(&d))
    };
    let member_ids: HashSet<i64> = employees
        .iter()
        .filter(|e| is_member(e))
        .map(|e| e.id)
        .collect();

    let index = ChildIndex::new(employees, &is_member);
    let roots = employees
        .iter()
        .enumerate()
        .filter(|(_, e)| is_member(e))
        .filter(|(_, e)| e.manager_id.is_none_or(|m| !member_ids.contains(&m)))
        .map(|(idx, _)| idx);
    index.grow(roots)
}

/// Remove `deleted_id`, promoting its direct reports to its own manager.
///
/// An unknown id leaves the collection unchanged.
pub fn reparent_on_delete(employees: Vec<Employee>, deleted_id: i64) -> Vec<Employee> {
    let Some(new_manager) = employees
        .iter()
        .find(|e| e.id == deleted_id)
        .map(|deleted| deleted.manager_id)
    else {
        return employees;
    };

    employees
        .into_iter()
        .filter(|e| e.id != deleted_id)
        .map(|mut e| {
            if e.manager_id == Some(deleted_id) {
                e.manager_id = new_manager;
            }
            e
        })
        .collect()
}

/// Would making `manager_id` the manager of `employee_id` put the employee above itself?
pub fn would_create_cycle(employees: &[Employee], employee_id: i64, manager_id: i64) -> bool {
    if employee_id == manager_id {
        return true;
    }
    let by_id: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
    let mut seen = HashSet::new();
    let mut current = Some(manager_id);
    while let Some(id) = current {
        if id == employee_id {
            return true;
        }
        if !seen.insert(id) {
            // pre-existing loop above the new manager that does not include employee_id
            return false;
        }
        current = by_id.get(&id).and_then(|e| e.manager_id);
    }
    false
}

/// Managers of `employee_id`, nearest first, up to the top of its tree
pub fn manager_chain(employees: &[Employee], employee_id: i64) -> Vec<Employee> {
    let by_id: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
    let mut seen = HashSet::from([employee_id]);
    let mut chain = Vec::new();
    let mut current = by_id.get(&employee_id).and_then(|e| e.manager_id);
    while let Some(id) = current {
        let Some(manager) = by_id.get(&id) else { break };
        if !seen.insert(id) {
            break;
        }
        chain.push((*manager).clone());
        current = manager.manager_id;
    }
    chain
}

/// Structural defects that keep employees out of the org chart
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Anomalies {
    /// Employees that are their own ancestor
    pub cyclic: Vec<i64>,
    /// Employees whose `manager_id` points at no known employee
    pub dangling: Vec<i64>,
}

impl Anomalies {
    pub fn is_empty(&self) -> bool {
        self.cyclic.is_empty() && self.dangling.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnPath,
    Done,
}

pub fn find_anomalies(employees: &[Employee]) -> Anomalies {
    let by_id: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
    let mut state: HashMap<i64, Visit> = HashMap::new();
    let mut anomalies = Anomalies::default();

    for start in employees {
        if state.contains_key(&start.id) {
            continue;
        }
        let mut path = Vec::new();
        let mut current = Some(start.id);
        while let Some(id) = current {
            match state.get(&id) {
                Some(Visit::Done) => break,
                Some(Visit::OnPath) => {
                    if let Some(pos) = path.iter().position(|&p| p == id) {
                        anomalies.cyclic.extend_from_slice(&path[pos..]);
                    }
                    break;
                }
                None => {}
            }
            let Some(employee) = by_id.get(&id) else { break };
            state.insert(id, Visit::OnPath);
            path.push(id);
            current = employee.manager_id;
        }
        for id in path {
            state.insert(id, Visit::Done);
        }
    }

    anomalies.dangling = employees
        .iter()
        .filter(|e| e.manager_id.is_some_and(|m| !by_id.contains_key(&m)))
        .map(|e| e.id)
        .collect();
    anomalies.cyclic.sort_unstable();
    anomalies
}
