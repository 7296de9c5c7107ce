//! Checkbox tree state.

use std::collections::HashMap;
use std::fmt;

use crate::error::GridError;

use super::item::MenuItem;

/// Called with the checked node ids after every check change.
pub type CheckedCallback = Box<dyn FnMut(&[i64]) + Send>;

/// Display state of a node's checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
    /// Some but not all descendants are checked. Never persisted.
    Indeterminate,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Depth in tree (0 = root).
    pub depth: u16,
    /// Persisted `checkedFlag`.
    flag: bool,
    indeterminate: bool,
    expanded: bool,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn state(&self) -> CheckState {
        if self.flag {
            CheckState::Checked
        } else if self.indeterminate {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }
}

/// A visible node in the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    /// Arena index.
    pub index: usize,
    pub id: i64,
    pub depth: u16,
    pub has_children: bool,
    pub is_expanded: bool,
    pub state: CheckState,
}

/// Checkbox tree over a menu snapshot.
///
/// # Example
///
/// ```ignore
/// let mut tree = CheckTree::from_items(menus)
///     .on_checked_change(|ids| log::info!("role menus: {:?}", ids));
/// tree.check(12, true)?;
/// let payload = tree.to_items();
/// ```
pub struct CheckTree {
    /// Nodes in pre-order: every descendant has a larger index than its ancestors.
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
    index: HashMap<i64, usize>,
    on_checked_change: Option<CheckedCallback>,
}

impl CheckTree {
    /// Build the arena and reconcile a possibly inconsistent snapshot.
    pub fn from_items(items: Vec<MenuItem>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            index: HashMap::new(),
            on_checked_change: None,
        };
        for item in items {
            let root = tree.push(item, None, 0);
            tree.roots.push(root);
        }
        tree.reconcile();
        tree
    }

    fn push(&mut self, item: MenuItem, parent: Option<usize>, depth: u16) -> usize {
        let index = self.nodes.len();
        if self.index.insert(item.id, index).is_some() {
            log::warn!("[tree] duplicate menu id {}, later node wins lookups", item.id);
        }
        self.nodes.push(TreeNode {
            id: item.id,
            name: item.name,
            icon: item.icon,
            path: item.path,
            parent,
            children: Vec::new(),
            depth,
            flag: item.checked_flag,
            indeterminate: false,
            expanded: parent.is_none(),
        });
        for child in item.children {
            let child_index = self.push(child, Some(index), depth + 1);
            self.nodes[index].children.push(child_index);
        }
        index
    }

    /// Set the callback fired after every check change.
    pub fn on_checked_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[i64]) + Send + 'static,
    {
        self.on_checked_change = Some(Box::new(f));
        self
    }

    /// Detach the check callback so an owner can fire it itself.
    pub fn take_on_checked_change(&mut self) -> Option<CheckedCallback> {
        self.on_checked_change.take()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: i64) -> Option<&TreeNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn state(&self, id: i64) -> Option<CheckState> {
        self.node(id).map(TreeNode::state)
    }

    fn lookup(&self, id: i64) -> Result<usize, GridError> {
        self.index.get(&id).copied().ok_or(GridError::UnknownNode(id))
    }

    // -------------------------------------------------------------------------
    // Checking
    // -------------------------------------------------------------------------

    /// Check or uncheck a node.
    ///
    /// The whole subtree takes the new value regardless of its previous
    /// state, then each ancestor is re-aggregated up to the root.
    pub fn check(&mut self, id: i64, value: bool) -> Result<(), GridError> {
        let index = self.lookup(id)?;

        let mut stack = vec![index];
        while let Some(i) = stack.pop() {
            let node = &mut self.nodes[i];
            node.flag = value;
            node.indeterminate = false;
            stack.extend(node.children.iter().copied());
        }

        let mut parent = self.nodes[index].parent;
        while let Some(p) = parent {
            self.aggregate(p);
            parent = self.nodes[p].parent;
        }

        log::debug!("[tree] node {} set to {}", id, value);
        self.notify();
        Ok(())
    }

    /// Click on a node's checkbox: checked nodes uncheck, anything else checks.
    pub fn toggle(&mut self, id: i64) -> Result<CheckState, GridError> {
        let index = self.lookup(id)?;
        let value = !self.nodes[index].flag;
        self.check(id, value)?;
        Ok(self.nodes[index].state())
    }

    /// Recompute a node from its direct children.
    fn aggregate(&mut self, index: usize) {
        let node = &self.nodes[index];
        if node.is_leaf() {
            self.nodes[index].indeterminate = false;
            return;
        }

        let total = node.children.len();
        let checked = node.children.iter().filter(|&&c| self.nodes[c].flag).count();
        let partial = node.children.iter().any(|&c| self.nodes[c].indeterminate);

        let (flag, indeterminate) = if checked == total {
            (true, false)
        } else if checked == 0 && !partial {
            (false, false)
        } else {
            (false, true)
        };

        let node = &mut self.nodes[index];
        node.flag = flag;
        node.indeterminate = indeterminate;
        log::trace!("[tree] node {} aggregated {:?}", node.id, node.state());
    }

    /// One bottom-up pass over the whole tree.
    fn reconcile(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            self.aggregate(index);
        }
    }

    fn notify(&mut self) {
        let ids = self.checked_ids();
        if let Some(on_checked_change) = self.on_checked_change.as_mut() {
            on_checked_change(&ids);
        }
    }

    /// Ids with `checkedFlag == 1`, in pre-order.
    pub fn checked_ids(&self) -> Vec<i64> {
        self.nodes.iter().filter(|n| n.flag).map(|n| n.id).collect()
    }

    /// Checked ids plus indeterminate ancestors, in pre-order.
    ///
    /// This is the set a role needs to reach every checked menu.
    pub fn effective_ids(&self) -> Vec<i64> {
        self.nodes
            .iter()
            .filter(|n| n.flag || n.indeterminate)
            .map(|n| n.id)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Expand/Collapse
    // -------------------------------------------------------------------------

    /// Toggle a node's expansion. Returns whether it is expanded afterwards.
    pub fn toggle_expanded(&mut self, id: i64) -> Result<bool, GridError> {
        let index = self.lookup(id)?;
        let node = &mut self.nodes[index];
        node.expanded = !node.expanded;
        Ok(node.expanded)
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = true;
        }
    }

    /// Collapse everything below the roots.
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = node.parent.is_none();
        }
    }

    /// Flattened visible nodes in display order.
    pub fn visible(&self) -> Vec<FlatNode> {
        let mut out = Vec::new();
        self.collect_visible(&self.roots, &mut out);
        out
    }

    fn collect_visible(&self, indices: &[usize], out: &mut Vec<FlatNode>) {
        for &index in indices {
            let node = &self.nodes[index];
            out.push(FlatNode {
                index,
                id: node.id,
                depth: node.depth,
                has_children: !node.is_leaf(),
                is_expanded: node.expanded,
                state: node.state(),
            });
            if node.expanded {
                self.collect_visible(&node.children, out);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    /// Snapshot with the current flags, shaped like the input.
    pub fn to_items(&self) -> Vec<MenuItem> {
        self.roots.iter().map(|&i| self.item_at(i)).collect()
    }

    fn item_at(&self, index: usize) -> MenuItem {
        let node = &self.nodes[index];
        MenuItem {
            id: node.id,
            name: node.name.clone(),
            icon: node.icon.clone(),
            path: node.path.clone(),
            checked_flag: node.flag,
            children: node.children.iter().map(|&c| self.item_at(c)).collect(),
        }
    }
}

impl fmt::Debug for CheckTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckTree")
            .field("nodes", &self.nodes)
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_are_stored_in_pre_order() {
        let tree = CheckTree::from_items(vec![
            MenuItem::new(1, "a").child(MenuItem::new(2, "b").child(MenuItem::new(3, "c"))),
            MenuItem::new(4, "d"),
        ]);
        let ids: Vec<i64> = tree.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(tree.nodes[2].parent, Some(1));
        assert_eq!(tree.nodes[2].depth, 2);
    }

    #[test]
    fn test_leaf_flag_survives_reconcile() {
        let tree = CheckTree::from_items(vec![MenuItem::new(1, "a").checked(true)]);
        assert_eq!(tree.state(1), Some(CheckState::Checked));
    }
}
