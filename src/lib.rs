//! An ordered map backed by a red-black tree.
//!
//! ```
//! use rbmap::RbTree;
//!
//! let mut map = RbTree::new();
//! map.put(2, "two");
//! map.put(1, "one");
//! map.put(2, "TWO");
//!
//! assert_eq!(map.get(&2), Some(&"TWO"));
//! assert_eq!(map.get(&3), None);
//! assert_eq!(map.len(), 2);
//! ```

#![deny(unsafe_code)]

// not concurrent
pub mod non_concurrent;

pub use non_concurrent::rbtree::{InvariantViolation, RbTree};

#[cfg(test)]
mod test_logging;
