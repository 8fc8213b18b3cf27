//! Data structures that assume exclusive access.
//!
//! Nothing in here synchronizes internally; share them between threads by
//! wrapping them in a lock.

pub mod rbtree;
