//! Checkbox tree with parent/child propagation.
//!
//! Nodes live in a flat arena with parent and child indices. Checking a node
//! overrides its whole subtree, then every ancestor is re-aggregated from its
//! children up to the root.

mod item;
mod state;

pub use item::MenuItem;
pub use state::{CheckState, CheckTree, CheckedCallback, FlatNode, TreeNode};
