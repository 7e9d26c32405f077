//! Activity forest rules.
//!
//! Nodes carry a depth computed once at insertion from their parent, so no
//! query ever has to walk up the tree. Walking down (descendant expansion) is
//! done here, one children lookup per visited node, without relying on
//! recursive queries in the storage backend.

use std::collections::BTreeSet;

pub const DEFAULT_MAX_DEPTH: u32 = 3;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("Parent activity {0} not found")]
    ParentNotFound(i32),
    #[error("Max nesting depth is {max_depth}")]
    MaxDepthExceeded { max_depth: u32 },
}

/// Depth of a new node.
///
/// `parent_depth` is the depth of the node `parent_id` points at, or `None`
/// when no such node exists.
pub fn depth_for(
    parent_id: Option<i32>,
    parent_depth: Option<i32>,
    max_depth: u32,
) -> Result<i32, TreeError> {
    let depth = match parent_id {
        None => 1,
        Some(parent_id) => parent_depth.ok_or(TreeError::ParentNotFound(parent_id))? + 1,
    };

    if depth as i64 > max_depth as i64 {
        return Err(TreeError::MaxDepthExceeded { max_depth });
    }
    Ok(depth)
}

/// Ids of `root` and of every node below it.
///
/// `children_of` returns the direct children of a node. Traversal uses an
/// explicit stack and never visits a node twice, so it terminates even on
/// corrupted (cyclic) data.
pub fn collect_descendants<E, F>(root: i32, mut children_of: F) -> Result<BTreeSet<i32>, E>
where
    F: FnMut(i32) -> Result<Vec<i32>, E>,
{
    let mut found = BTreeSet::new();
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        if !found.insert(current) {
            continue;
        }
        stack.extend(
            children_of(current)?
                .into_iter()
                .filter(|child| !found.contains(child)),
        );
    }
    Ok(found)
}
