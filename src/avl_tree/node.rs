use crate::arena::{Entry, TypedArena};
use crate::avl_tree::tree::{self, Tree};

/// A struct representing an internal node of an avl tree.
pub struct Node<T> {
    pub value: T,
    pub height: i32,
    pub balance_factor: i32,
    pub left: Tree,
    pub right: Tree,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            height: 0,
            balance_factor: 0,
            left: None,
            right: None,
        }
    }
}

/// A read-only view of a node in an `AvlSet<T>`.
///
/// Node views exist for presentation and diagnostics; they expose the structure of the tree
/// without allowing it to be modified.
///
/// # Examples
///
/// ```
/// use avl_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(2);
/// set.insert(1);
/// set.insert(3);
///
/// let root = set.root().unwrap();
/// assert_eq!(root.value(), &2);
/// assert_eq!(root.left().map(|node| *node.value()), Some(1));
/// assert_eq!(root.right().map(|node| *node.value()), Some(3));
/// assert_eq!(root.height(), 1);
/// assert_eq!(root.balance_factor(), 0);
/// ```
pub struct NodeRef<'a, T>
where
    T: 'a,
{
    arena: &'a TypedArena<Node<T>>,
    entry: Entry,
}

impl<'a, T> NodeRef<'a, T>
where
    T: 'a,
{
    pub(crate) fn new(arena: &'a TypedArena<Node<T>>, entry: Entry) -> Self {
        NodeRef { arena, entry }
    }

    fn node(&self) -> &'a Node<T> {
        let arena: &'a TypedArena<Node<T>> = self.arena;
        &arena[self.entry]
    }

    /// Returns the value stored in this node.
    pub fn value(&self) -> &'a T {
        &self.node().value
    }

    /// Returns the left child of this node, if any.
    pub fn left(&self) -> Option<NodeRef<'a, T>> {
        self.node().left.map(|entry| NodeRef::new(self.arena, entry))
    }

    /// Returns the right child of this node, if any.
    pub fn right(&self) -> Option<NodeRef<'a, T>> {
        self.node().right.map(|entry| NodeRef::new(self.arena, entry))
    }

    /// Returns the height of the subtree rooted at this node. A leaf has height 0.
    pub fn height(&self) -> i32 {
        tree::height(self.arena, Some(self.entry))
    }

    /// Returns the height of the right subtree minus the height of the left subtree.
    pub fn balance_factor(&self) -> i32 {
        self.node().balance_factor
    }
}

impl<'a, T> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NodeRef<'a, T> {}
