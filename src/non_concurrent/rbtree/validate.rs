use std::fmt;

use log::warn;

use super::node::{Color, NodeId};
use super::RbTree;

/// A broken red-black tree property, as found by [`RbTree::validate`].
///
/// Nodes are identified by their insertion index: `0` is the node created by
/// the first distinct key put into the map, and so on.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    RedRoot,
    RedRedEdge { parent: usize, child: usize },
    BlackHeightMismatch { node: usize, left: usize, right: usize },
    OrderViolation { node: usize },
    BrokenParentLink { node: usize },
    LengthMismatch { reachable: usize, recorded: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::RedRoot => write!(f, "the root is red"),
            Self::RedRedEdge { parent, child } => {
                write!(f, "red node #{parent} has red child #{child}")
            }
            Self::BlackHeightMismatch { node, left, right } => write!(
                f,
                "node #{node} has black height {left} on its left and {right} on its right"
            ),
            Self::OrderViolation { node } => {
                write!(f, "node #{node} is out of order with its ancestors")
            }
            Self::BrokenParentLink { node } => {
                write!(f, "node #{node} does not point back to its parent")
            }
            Self::LengthMismatch { reachable, recorded } => write!(
                f,
                "{reachable} nodes are reachable from the root but the length is {recorded}"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl<K: Ord, V> RbTree<K, V> {
    /// Checks every red-black and search tree property of the map.
    ///
    /// Returns the black height of the root (not counting the absent leaves)
    /// or the first violation found. Walks the whole tree, so this is `O(n)`.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        self.check().inspect_err(|e| warn!("red-black tree is invalid: {e}"))
    }

    fn check(&self) -> Result<usize, InvariantViolation> {
        if let Some(root) = self.root {
            if self.node(root).color.is_red() {
                return Err(InvariantViolation::RedRoot);
            }
            if self.parent_of(root).is_some() {
                return Err(InvariantViolation::BrokenParentLink { node: root.index() });
            }
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(self.root, None, None, &mut reachable)?;

        if reachable != self.length {
            return Err(InvariantViolation::LengthMismatch { reachable, recorded: self.length });
        }
        Ok(black_height)
    }

    /// Checks the subtree at `id`, whose keys must lie strictly between
    /// `lower` and `upper`, and returns its black height.
    fn check_subtree(
        &self,
        id: Option<NodeId>,
        lower: Option<&K>,
        upper: Option<&K>,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let Some(id) = id else { return Ok(0) };
        let node = self.node(id);
        *reachable += 1;

        if lower.is_some_and(|lo| node.key <= *lo) || upper.is_some_and(|hi| node.key >= *hi) {
            return Err(InvariantViolation::OrderViolation { node: id.index() });
        }

        for child in [node.left, node.right].into_iter().flatten() {
            if self.parent_of(child) != Some(id) {
                return Err(InvariantViolation::BrokenParentLink { node: child.index() });
            }
            if node.color.is_red() && self.node(child).color.is_red() {
                return Err(InvariantViolation::RedRedEdge {
                    parent: id.index(),
                    child: child.index(),
                });
            }
        }

        let left = self.check_subtree(node.left, lower, Some(&node.key), reachable)?;
        let right = self.check_subtree(node.right, Some(&node.key), upper, reachable)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { node: id.index(), left, right });
        }

        Ok(left + usize::from(node.color == Color::Black))
    }
}
