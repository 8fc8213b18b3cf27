use log::trace;

use super::node::{NodeId, Side};
use super::RbTree;

//     n                       pivot
//    / \                      /   \
//   a   pivot   rotate left   n     c
//       /   \      -->       / \
//      b     c               a   b
//
// `rotate(n, Side::Left)` is the picture above read left to right,
// `rotate(n, Side::Right)` is the same picture mirrored.

impl<K, V> RbTree<K, V> {
    /// Moves `n` down to its `dir` side, lifting its child on the other side
    /// into its place. Colors are left alone.
    pub(super) fn rotate(&mut self, n: NodeId, dir: Side) {
        let Some(pivot) = self.child(n, dir.opposite()) else {
            debug_assert!(false, "rotating {n:?} {dir:?} without a pivot");
            return
        };
        trace!("rotating {n:?} {dir:?}, lifting {pivot:?}");
        #[cfg(test)]
        {
            self.rotations += 1;
        }

        // the pivot's inner subtree changes hands
        let inner = self.child(pivot, dir);
        *self.node_mut(n).child_mut(dir.opposite()) = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(n);
        }

        let parent = self.parent_of(n);
        self.node_mut(pivot).parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(parent) => {
                let side = self.side_of(n, parent);
                *self.node_mut(parent).child_mut(side) = Some(pivot);
            }
        }

        *self.node_mut(pivot).child_mut(dir) = Some(n);
        self.node_mut(n).parent = Some(pivot);
    }
}
