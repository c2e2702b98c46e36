//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod cursor;
mod node;
pub mod printer;
mod set;
mod tree;

pub use self::cursor::InorderCursor;
pub use self::node::NodeRef;
pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter};
