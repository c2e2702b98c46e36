use crate::arena::{Entry, TypedArena};
use crate::avl_tree::cursor::InorderCursor;
use crate::avl_tree::node::NodeRef;
use crate::avl_tree::printer;
use crate::avl_tree::tree::{self, Arena, Tree};
use crate::config::AvlConfig;
use crate::error::{AvlError, AvlResult};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

static NEXT_TREE_ID: AtomicUsize = AtomicUsize::new(0);

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Every insertion and
/// removal rebalances the nodes on the path it touched, so the height of the tree stays
/// logarithmic in the number of values.
///
/// Nodes are stored in an arena owned by the set.
///
/// # Examples
///
/// ```
/// use avl_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Ok(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct AvlSet<T> {
    arena: Arena<T>,
    root: Tree,
    len: usize,
    modifications: u64,
    id: usize,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(AvlConfig::default())
    }

    /// Constructs a new, empty `AvlSet<T>` using the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlConfig;
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::with_config(AvlConfig { chunk_size: 16 });
    /// assert!(set.is_empty());
    /// ```
    pub fn with_config(config: AvlConfig) -> Self {
        AvlSet {
            arena: TypedArena::new(config.effective_chunk_size()),
            root: None,
            len: 0,
            modifications: 0,
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub(crate) fn arena(&self) -> &Arena<T> {
        &self.arena
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn modifications(&self) -> u64 {
        self.modifications
    }

    /// Inserts a value into the set. Returns `true` if the value was added and `false` if an
    /// equal value was already present, in which case the set is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        let AvlSet {
            ref mut arena,
            ref mut root,
            ref mut len,
            ref mut modifications,
            ..
        } = self;
        match tree::insert(arena, root, value) {
            Ok(()) => {
                *len += 1;
                *modifications += 1;
                true
            },
            Err(_) => false,
        }
    }

    /// Removes a value from the set. Returns `true` if the value was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove<V>(&mut self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes a value from the set and returns it. Returns `None` if the value was not present.
    ///
    /// When the removed value sits in a node with two children, the node takes over the largest
    /// value of its left subtree if that subtree is at least as tall as the right one, and the
    /// smallest value of its right subtree otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.take(&1), Some(1));
    /// assert_eq!(set.take(&1), None);
    /// ```
    pub fn take<V>(&mut self, value: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let AvlSet {
            ref mut arena,
            ref mut root,
            ref mut len,
            ref mut modifications,
            ..
        } = self;
        tree::remove(arena, root, value).map(|value| {
            *len -= 1;
            *modifications += 1;
            value
        })
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, value: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.get(value).is_some()
    }

    /// Returns a reference to the value in the set equal to `value`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(String::from("avl"));
    /// assert_eq!(set.get("avl"), Some(&String::from("avl")));
    /// assert_eq!(set.get("bst"), None);
    /// ```
    pub fn get<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.arena, self.root, value)
    }

    /// Returns the number of values in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree. Both an empty set and a set with a single value have
    /// height 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.height(), 0);
    /// set.insert(1);
    /// assert_eq!(set.height(), 0);
    /// set.insert(2);
    /// assert_eq!(set.height(), 1);
    /// ```
    pub fn height(&self) -> usize {
        match self.root {
            None => 0,
            Some(_) => tree::height(&self.arena, self.root) as usize,
        }
    }

    /// Clears the set, removing all values. Any outstanding cursor becomes stale if the set was
    /// not already empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        if self.root.is_some() {
            trace!(len = self.len, "clearing tree");
            self.arena.clear();
            self.root = None;
            self.len = 0;
            self.modifications += 1;
        }
    }

    /// Returns the greatest value in the set that is less than or equal to `value`. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::floor(&self.arena, self.root, value)
    }

    /// Returns the least value in the set that is greater than or equal to `value`. Returns
    /// `None` if such a value does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, value: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::ceil(&self.arena, self.root, value)
    }

    /// Returns the minimum value of the set.
    ///
    /// # Errors
    ///
    /// Returns `AvlError::EmptyStructure` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::AvlError;
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.min(), Err(AvlError::EmptyStructure));
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> AvlResult<&T> {
        tree::min(&self.arena, self.root).ok_or(AvlError::EmptyStructure)
    }

    /// Returns the maximum value of the set.
    ///
    /// # Errors
    ///
    /// Returns `AvlError::EmptyStructure` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Ok(&3));
    /// ```
    pub fn max(&self) -> AvlResult<&T> {
        tree::max(&self.arena, self.root).ok_or(AvlError::EmptyStructure)
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            arena: &self.arena,
            current: self.root,
            stack: Vec::new(),
            remaining: self.len,
        }
    }

    /// Returns a fail-fast cursor positioned before the smallest value of the set. See
    /// `InorderCursor` for details.
    pub fn cursor(&self) -> InorderCursor {
        InorderCursor::new(self.id, self.modifications, self.root)
    }

    /// Returns a read-only view of the root node, or `None` if the set is empty.
    pub fn root(&self) -> Option<NodeRef<T>> {
        self.root.map(|entry| NodeRef::new(&self.arena, entry))
    }

    /// Checks that every node orders correctly against its direct children.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// for value in 0..32 {
    ///     set.insert(value);
    ///     assert!(set.validate_invariant());
    /// }
    /// ```
    pub fn validate_invariant(&self) -> bool
    where
        T: Ord,
    {
        tree::is_ordered(&self.arena, self.root)
    }

    /// Checks that every stored height and balance factor agrees with the node's children, that
    /// every balance factor is within `[-1, 1]`, and that the number of reachable nodes equals
    /// `len()`.
    pub fn validate_balance(&self) -> bool {
        tree::count_balanced(&self.arena, self.root) == Some(self.len)
            && self.arena.len() == self.len
    }
}

impl<T> IntoIterator for AvlSet<T> {
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            arena: self.arena,
            current: self.root,
            stack: Vec::new(),
            remaining: self.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned values.
pub struct AvlSetIntoIter<T> {
    arena: Arena<T>,
    current: Tree,
    stack: Vec<Entry>,
    remaining: usize,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.current {
            self.stack.push(entry);
            self.current = self.arena[entry].left;
        }
        self.stack.pop().map(|entry| {
            let node = self.arena.free(&entry);
            self.current = node.right;
            self.remaining -= 1;
            node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for AvlSetIntoIter<T> {}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    arena: &'a Arena<T>,
    current: Tree,
    stack: Vec<Entry>,
    remaining: usize,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(entry) = self.current {
            self.stack.push(entry);
            self.current = arena[entry].left;
        }
        self.stack.pop().map(|entry| {
            let node = &arena[entry];
            self.current = node.right;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for AvlSetIter<'a, T> where T: 'a {}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &AvlSet<T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Eq {}

impl<T> fmt::Debug for AvlSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> fmt::Display for AvlSet<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&printer::render(self.root()))
    }
}

impl<T> Serialize for AvlSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self)
    }
}

struct AvlSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for AvlSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = AvlSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of values")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut set = AvlSet::new();
        while let Some(value) = seq.next_element()? {
            set.insert(value);
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for AvlSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlSetVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AvlSet;
    use crate::error::AvlError;
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.len(), 0);
        assert_eq!(set.height(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.min(), Err(AvlError::EmptyStructure));
        assert_eq!(set.max(), Err(AvlError::EmptyStructure));
    }

    #[test]
    fn test_insert() {
        let mut set = AvlSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = AvlSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = AvlSet::new();
        set.insert(1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut set = AvlSet::new();
        set.insert(1);
        assert!(!set.remove(&2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_take() {
        let mut set = AvlSet::new();
        set.insert(String::from("a"));
        assert_eq!(set.take("a"), Some(String::from("a")));
        assert_eq!(set.take("a"), None);
    }

    #[test]
    fn test_min_max() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Ok(&1));
        assert_eq!(set.max(), Ok(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.floor(&0), None);
        assert_eq!(set.floor(&2), Some(&1));
        assert_eq!(set.floor(&4), Some(&3));
        assert_eq!(set.floor(&6), Some(&5));

        assert_eq!(set.ceil(&0), Some(&1));
        assert_eq!(set.ceil(&2), Some(&3));
        assert_eq!(set.ceil(&4), Some(&5));
        assert_eq!(set.ceil(&6), None);
    }

    #[test]
    fn test_height() {
        let mut set = AvlSet::new();
        for value in 0..7 {
            set.insert(value);
        }
        assert_eq!(set.height(), 2);
        assert!(set.validate_balance());
    }

    #[test]
    fn test_clear() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(2);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.validate_balance());
        assert!(set.insert(1));
    }

    #[test]
    fn test_clear_invalidates_cursor() {
        let mut set = AvlSet::new();
        set.insert(1);
        let mut cursor = set.cursor();
        set.clear();
        assert!(cursor.next(&set).is_err());
    }

    #[test]
    fn test_into_iter() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        let iter = set.into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_root() {
        let mut set = AvlSet::new();
        assert!(set.root().is_none());
        set.insert(1);
        set.insert(2);

        let root = set.root().unwrap();
        assert_eq!(root.value(), &1);
        assert_eq!(root.balance_factor(), 1);
        assert!(root.left().is_none());
        assert_eq!(root.right().map(|node| node.height()), Some(0));
    }

    #[test]
    fn test_debug() {
        let mut set = AvlSet::new();
        set.insert(2);
        set.insert(1);
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_display() {
        let mut set = AvlSet::new();
        set.insert(2);
        set.insert(1);
        set.insert(3);
        assert_eq!(set.to_string(), "2\n├───1\n└───3");
    }

    #[test]
    fn test_serde_tokens() {
        let mut set = AvlSet::new();
        set.insert(2u32);
        set.insert(1u32);

        assert_tokens(
            &set,
            &[
                Token::Seq { len: Some(2) },
                Token::U32(1),
                Token::U32(2),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let mut set = AvlSet::new();
        set.insert(1u32);

        assert_de_tokens(
            &set,
            &[
                Token::Seq { len: Some(2) },
                Token::U32(1),
                Token::U32(1),
                Token::SeqEnd,
            ],
        );
    }
}
