//! An ordered set backed by an AVL tree.
//!
//! `AvlSet<T>` keeps its values in an arena-allocated binary search tree whose nodes never
//! differ in subtree height by more than one, so membership tests, insertions and removals all
//! run in logarithmic time. Besides the usual borrowing iterator, the set hands out
//! `InorderCursor`s that do not hold a borrow between steps and instead fail with
//! `AvlError::StaleIterator` once the set has been modified.
//!
//! # Examples
//!
//! ```
//! use avl_collections::avl_tree::AvlSet;
//!
//! let mut set = AvlSet::new();
//! for value in &[5, 3, 8, 1, 4, 7, 9, 2] {
//!     assert!(set.insert(*value));
//! }
//!
//! assert_eq!(set.height(), 3);
//! assert!(set.remove(&5));
//! assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![1, 2, 3, 4, 7, 8, 9]);
//! ```

mod arena;
pub mod avl_tree;
mod config;
mod error;

pub use crate::config::AvlConfig;
pub use crate::error::{AvlError, AvlResult};
