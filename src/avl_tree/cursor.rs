use crate::arena::Entry;
use crate::avl_tree::set::AvlSet;
use crate::avl_tree::tree::Tree;
use crate::error::{AvlError, AvlResult};
use tracing::debug;

/// A fail-fast in-order cursor over an `AvlSet<T>`.
///
/// Unlike `AvlSetIter<'a, T>`, a cursor does not borrow the set between steps, so the set may be
/// modified while the cursor is alive. The cursor records the set's modification count when it
/// is created; every step checks it against the set it is given and fails with
/// `AvlError::StaleIterator` once the set has been modified. A cursor that has failed keeps
/// failing.
///
/// # Examples
///
/// ```
/// use avl_collections::AvlError;
/// use avl_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(1);
/// set.insert(2);
///
/// let mut cursor = set.cursor();
/// assert_eq!(cursor.next(&set), Ok(Some(&1)));
///
/// set.insert(3);
/// assert_eq!(
///     cursor.next(&set),
///     Err(AvlError::StaleIterator { expected: 2, found: 3 }),
/// );
/// ```
pub struct InorderCursor {
    tree_id: usize,
    expected_modifications: u64,
    current: Tree,
    stack: Vec<Entry>,
    failure: Option<AvlError>,
}

impl InorderCursor {
    pub(crate) fn new(tree_id: usize, expected_modifications: u64, root: Tree) -> Self {
        InorderCursor {
            tree_id,
            expected_modifications,
            current: root,
            stack: Vec::new(),
            failure: None,
        }
    }

    fn check<T>(&mut self, set: &AvlSet<T>) -> AvlResult<()> {
        if let Some(error) = self.failure {
            return Err(error);
        }

        let error = if set.id() != self.tree_id {
            AvlError::ForeignTree
        } else if set.modifications() != self.expected_modifications {
            AvlError::StaleIterator {
                expected: self.expected_modifications,
                found: set.modifications(),
            }
        } else {
            return Ok(());
        };

        debug!(%error, "in-order cursor invalidated");
        self.failure = Some(error);
        self.current = None;
        self.stack.clear();
        Err(error)
    }

    /// Returns `true` if the cursor has more values to yield.
    ///
    /// # Errors
    ///
    /// Returns `AvlError::StaleIterator` if `set` was modified since the cursor was created and
    /// `AvlError::ForeignTree` if `set` did not create this cursor.
    pub fn has_next<T>(&mut self, set: &AvlSet<T>) -> AvlResult<bool> {
        self.check(set)?;
        Ok(self.current.is_some() || !self.stack.is_empty())
    }

    /// Advances the cursor, returning the next value in ascending order or `None` once every
    /// value has been visited.
    ///
    /// # Errors
    ///
    /// Same conditions as `has_next`.
    #[allow(clippy::should_implement_trait)]
    pub fn next<'a, T>(&mut self, set: &'a AvlSet<T>) -> AvlResult<Option<&'a T>> {
        self.check(set)?;

        let arena = set.arena();
        while let Some(entry) = self.current {
            self.stack.push(entry);
            self.current = arena[entry].left;
        }

        Ok(match self.stack.pop() {
            Some(entry) => {
                let node = &arena[entry];
                self.current = node.right;
                Some(&node.value)
            },
            None => None,
        })
    }

    /// Removal through a cursor is not supported; this always fails with
    /// `AvlError::UnsupportedMutation`.
    pub fn remove(&mut self) -> AvlResult<()> {
        Err(AvlError::UnsupportedMutation)
    }
}
