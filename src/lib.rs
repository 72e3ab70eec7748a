//! An ordered set backed by an avl tree.
//!
//! The tree stores its nodes in an arena and keeps a parent link in every node, so in-order
//! iteration walks the tree without an auxiliary stack. Every mutation rebalances the access
//! path on the way back up, which keeps the height of the tree logarithmic in its size.
//!
//! # Examples
//! ```
//! use avl_set::avl_tree::AvlSet;
//!
//! let mut set: AvlSet<u32> = (1..=20).collect();
//! assert_eq!(set.root(), Some(&8));
//!
//! set.discard(&8);
//! assert_eq!(set.root(), Some(&7));
//! assert_eq!(set.len(), 19);
//! ```

pub mod arena;
pub mod avl_tree;
