use std::cmp::Ordering;
use std::fmt;
use std::mem;

mod fixup;
mod node;
mod rotate;
mod validate;

use node::{Color, Node, NodeId, Side};

pub use validate::InvariantViolation;

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTree with `n` internal nodes has height at most `2*log₂(n+1)`

/// An ordered map backed by a red-black tree.
///
/// Lookups and insertions are `O(log n)` in the worst case. Keys are ordered
/// by their `Ord` impl and are unique; putting an existing key overwrites its
/// value in place.
///
/// Nodes live in an arena owned by the tree, and are linked to each other by
/// index. Nothing is ever removed from the map.
pub struct RbTree<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Option<NodeId>,
    length: usize,
    #[cfg(test)]
    rotations: usize,
}

impl<K, V> RbTree<K, V> {
    /// Creates an empty map.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            length: 0,
            #[cfg(test)]
            rotations: 0,
        }
    }

    /// Creates an empty map with room for `capacity` keys before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
            length: 0,
            #[cfg(test)]
            rotations: 0,
        }
    }

    /// The number of distinct keys in the map.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of nodes on the longest path from the root down to a leaf.
    ///
    /// This is `0` for an empty map, and never more than `2*log₂(len+1)`.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, id: Option<NodeId>) -> usize {
        match id {
            None => 0,
            Some(id) => {
                let node = self.node(id);
                1 + self.subtree_height(node.left).max(self.subtree_height(node.right))
            }
        }
    }

    fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.index()]
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.node(id).child(side)
    }

    /// Which child of `parent` the node `id` is.
    fn side_of(&self, id: NodeId, parent: NodeId) -> Side {
        if self.node(parent).left == Some(id) {
            Side::Left
        } else {
            debug_assert_eq!(self.node(parent).right, Some(id));
            Side::Right
        }
    }

    /// Absent nodes are black.
    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.node(id).color)
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.length += 1;
        id
    }

    fn walk_in_order<'a>(&'a self, id: Option<NodeId>, f: &mut impl FnMut(&'a K, &'a V)) {
        if let Some(id) = id {
            let node = self.node(id);
            self.walk_in_order(node.left, f);
            f(&node.key, &node.value);
            self.walk_in_order(node.right, f);
        }
    }
}

impl<K: Ord, V> RbTree<K, V> {
    fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;

        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }

        None
    }

    /// Returns a reference to the value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.node(id).value)
    }

    /// Returns a mutable reference to the value stored under `key`, if any.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.node_mut(id).value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Associates `value` with `key`.
    ///
    /// If the key was already present its value is overwritten and the old
    /// value is returned; the length is unchanged. Otherwise a new entry is
    /// created and the tree is rebalanced.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            let id = self.alloc(Node::new(key, value, Color::Black, None));
            self.root = Some(id);
            return None;
        };

        let (parent, side) = loop {
            let node = self.node(current);
            let (side, next) = match key.cmp(&node.key) {
                Ordering::Equal => {
                    let node = self.node_mut(current);
                    return Some(mem::replace(&mut node.value, value));
                }
                Ordering::Less => (Side::Left, node.left),
                Ordering::Greater => (Side::Right, node.right),
            };

            match next {
                Some(next) => current = next,
                None => break (current, side),
            }
        };

        // new nodes are always red, only the root may be born black
        let id = self.alloc(Node::new(key, value, Color::Red, Some(parent)));
        *self.node_mut(parent).child_mut(side) = Some(id);

        self.fix_insert(id);
        None
    }
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.walk_in_order(self.root, &mut |k, v| {
            map.entry(k, v);
        });
        map.finish()
    }
}

#[cfg(test)]
impl<K: fmt::Display, V> RbTree<K, V> {
    /// Renders the key layout as nested `(left key right)` groups, with `_`
    /// standing in for an absent child and bare keys for leaves.
    pub(crate) fn shape(&self) -> String {
        fn render<K: fmt::Display, V>(tree: &RbTree<K, V>, id: Option<NodeId>) -> String {
            let Some(id) = id else { return "_".to_string() };
            let node = tree.node(id);
            if node.left.is_none() && node.right.is_none() {
                return node.key.to_string();
            }
            format!("({} {} {})", render(tree, node.left), node.key, render(tree, node.right))
        }
        render(self, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_logging::initialize_logging;

    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn empty_tree() {
        let tree = RbTree::<i64, &str>::new();
        assert_eq!(tree.get(&1), None);
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.validate(), Ok(0));
    }

    #[test]
    fn single_put() {
        let mut tree = RbTree::new();
        assert_eq!(tree.put(1, "one"), None);

        assert_eq!(tree.get(&1), Some(&"one"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.color_of(tree.root), Color::Black);
        assert_eq!(tree.validate(), Ok(1));
    }

    #[test]
    fn three_ascending_puts_balance() {
        initialize_logging();
        let mut tree = RbTree::new();
        tree.put(1, "a");
        tree.put(2, "b");
        tree.put(3, "c");

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(&1), Some(&"a"));
        assert_eq!(tree.get(&2), Some(&"b"));
        assert_eq!(tree.get(&3), Some(&"c"));
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.shape(), "(1 2 3)");
        assert_eq!(tree.validate(), Ok(1));
    }

    #[test]
    fn overwrite_keeps_length() {
        let mut tree = RbTree::new();
        for (k, v) in [(1, "one"), (2, "two"), (3, "three")] {
            tree.put(k, v);
        }

        assert_eq!(tree.put(2, "TWO"), Some("two"));
        assert_eq!(tree.get(&2), Some(&"TWO"));
        assert_eq!(tree.len(), 3);

        for (k, v) in [(4, "four"), (5, "five"), (6, "six")] {
            assert_eq!(tree.put(k, v), None);
        }
        assert_eq!(tree.get(&4), Some(&"four"));
        assert_eq!(tree.get(&5), Some(&"five"));
        assert_eq!(tree.get(&6), Some(&"six"));
        assert_eq!(tree.len(), 6);

        assert_eq!(tree.get(&7), None);
        assert_eq!(tree.get(&-1), None);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn absent_is_not_a_stored_none() {
        let mut tree = RbTree::new();
        tree.put(1, None::<u8>);

        assert_eq!(tree.get(&1), Some(&None));
        assert_eq!(tree.get(&2), None);
        assert!(tree.contains_key(&1));
        assert!(!tree.contains_key(&2));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut tree = RbTree::new();
        tree.put("b", 1);
        tree.put("a", 2);

        *tree.get_mut(&"b").unwrap() += 10;
        assert_eq!(tree.get(&"b"), Some(&11));
        assert_eq!(tree.get_mut(&"c"), None);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn ascending_keys_stay_logarithmic() {
        initialize_logging();
        let mut tree = RbTree::with_capacity(100);
        for k in 1..=100 {
            tree.put(k, k * k);
            assert!(tree.validate().is_ok(), "invalid after putting {k}");
        }

        assert_eq!(tree.len(), 100);
        let bound = 2.0 * (101f64).log2();
        assert!((tree.height() as f64) <= bound, "height {} > {bound}", tree.height());
        for k in 1..=100 {
            assert_eq!(tree.get(&k), Some(&(k * k)));
        }
    }

    #[test]
    fn descending_keys_stay_logarithmic() {
        let mut tree = RbTree::new();
        for k in (0..1000).rev() {
            tree.put(k, ());
        }

        assert_eq!(tree.len(), 1000);
        assert!((tree.height() as f64) <= 2.0 * (1001f64).log2());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn zig_zag_insertions() {
        let mut tree = RbTree::new();
        tree.put(10, ());
        tree.put(5, ());
        tree.put(7, ());
        assert_eq!(tree.shape(), "(5 7 10)");

        let mut tree = RbTree::new();
        tree.put(10, ());
        tree.put(15, ());
        tree.put(12, ());
        assert_eq!(tree.shape(), "(10 12 15)");
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn red_uncle_recolors() {
        let mut tree = RbTree::new();
        for k in [2, 1, 3] {
            tree.put(k, ());
        }
        // both children red, so the next put recolors instead of rotating
        tree.put(4, ());

        assert_eq!(tree.shape(), "(1 2 (_ 3 4))");
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).color, Color::Black);
        assert_eq!(tree.color_of(tree.find(&1)), Color::Black);
        assert_eq!(tree.color_of(tree.find(&3)), Color::Black);
        assert_eq!(tree.color_of(tree.find(&4)), Color::Red);
        assert_eq!(tree.validate(), Ok(2));
    }

    #[test]
    fn random_puts_match_btreemap() {
        initialize_logging();
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut tree = RbTree::new();
        let mut reference = BTreeMap::new();

        for i in 0..2000 {
            let k: i32 = rng.gen_range(-500..500);
            assert_eq!(tree.put(k, i), reference.insert(k, i));
            assert_eq!(tree.len(), reference.len());
            if let Err(e) = tree.validate() {
                panic!("invalid tree after putting {k}: {e}");
            }
        }

        for k in -600..600 {
            assert_eq!(tree.get(&k), reference.get(&k));
        }
        assert!((tree.height() as f64) <= 2.0 * ((tree.len() + 1) as f64).log2());
    }

    #[test]
    fn debug_prints_in_key_order() {
        let mut tree = RbTree::new();
        for k in [3, 1, 2] {
            tree.put(k, k.to_string());
        }
        assert_eq!(format!("{tree:?}"), r#"{1: "1", 2: "2", 3: "3"}"#);
        assert_eq!(format!("{:?}", RbTree::<u8, u8>::default()), "{}");
    }

    #[test]
    fn externally_locked_across_threads() {
        const T: usize = 8;
        const R: usize = 250;

        let tree = Arc::new(Mutex::new(RbTree::new()));

        let handles = (0..T).map(|t| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move ||
                for r in 0..R {
                    tree.lock().unwrap().put(t * R + r, t);
                }
            )
        }).collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        let tree = tree.lock().unwrap();
        assert_eq!(tree.len(), T * R);
        assert!(tree.validate().is_ok());
        assert_eq!(tree.get(&(3 * R)), Some(&3));
    }
}
