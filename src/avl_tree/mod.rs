//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod error;
mod node;
mod set;
mod tree;

pub use self::error::{Error, Result};
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};
