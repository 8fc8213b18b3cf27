use log::debug;

use super::node::{Color, NodeId};
use super::RbTree;

impl<K, V> RbTree<K, V> {
    /// Restores the red-black properties after `n` was inserted as a red leaf.
    ///
    /// The only property that can be broken by the insertion is "a red node
    /// has no red children", between `n` and its parent. Each iteration either
    /// fixes it with at most two rotations (and stops), or recolors and pushes
    /// the violation two levels up.
    pub(super) fn fix_insert(&mut self, mut n: NodeId) {
        while let Some(parent) = self.parent_of(n) {
            if self.color_of(Some(parent)).is_black() {
                break
            }

            // the root is black, so a red parent always has a parent
            let Some(grandparent) = self.parent_of(parent) else {
                debug_assert!(false, "red node {parent:?} is the root");
                break
            };

            let side = self.side_of(parent, grandparent);
            let uncle = self.child(grandparent, side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.color_of(Some(u)).is_red()) {
                debug!("fix_insert: red uncle {uncle:?}, recoloring below {grandparent:?}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                n = grandparent;
                continue
            }

            let mut parent = parent;
            if self.side_of(n, parent) == side.opposite() {
                // zig-zag: turn it into a zig-zig hanging from the same grandparent
                debug!("fix_insert: straightening {n:?} under {parent:?}");
                self.rotate(parent, side);
                (n, parent) = (parent, n);
            }

            debug!("fix_insert: lifting {parent:?} over {grandparent:?}");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }
}
