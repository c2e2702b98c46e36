use crate::arena::{Entry, TypedArena};
use crate::avl_tree::node::Node;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;
use tracing::trace;

pub type Tree = Option<Entry>;
pub type Arena<T> = TypedArena<Node<T>>;

/// Returns the height of `tree`, where an empty tree has height -1 and a leaf has height 0.
pub fn height<T>(arena: &Arena<T>, tree: Tree) -> i32 {
    match tree {
        None => -1,
        Some(entry) => arena[entry].height,
    }
}

fn balance_factor<T>(arena: &Arena<T>, entry: Entry) -> i32 {
    arena[entry].balance_factor
}

// recomputes the height and balance factor of a node from its children
fn update<T>(arena: &mut Arena<T>, entry: Entry) {
    let left_height = height(arena, arena[entry].left);
    let right_height = height(arena, arena[entry].right);
    let node = &mut arena[entry];
    node.balance_factor = right_height - left_height;
    node.height = 1 + cmp::max(left_height, right_height);
}

fn rotate_left<T>(arena: &mut Arena<T>, entry: Entry) -> Entry {
    let child = match arena[entry].right {
        Some(child) => child,
        None => unreachable!(),
    };
    let grandchild = arena[child].left;
    arena[entry].right = grandchild;
    arena[child].left = Some(entry);
    update(arena, entry);
    update(arena, child);
    child
}

fn rotate_right<T>(arena: &mut Arena<T>, entry: Entry) -> Entry {
    let child = match arena[entry].left {
        Some(child) => child,
        None => unreachable!(),
    };
    let grandchild = arena[child].right;
    arena[entry].left = grandchild;
    arena[child].right = Some(entry);
    update(arena, entry);
    update(arena, child);
    child
}

// recomputes `entry` from its children and restores the balance invariant, returning the new
// local root
fn balance<T>(arena: &mut Arena<T>, entry: Entry) -> Entry {
    update(arena, entry);

    let factor = balance_factor(arena, entry);
    if factor > 1 {
        let child = match arena[entry].right {
            Some(child) => child,
            None => unreachable!(),
        };
        if balance_factor(arena, child) < 0 {
            trace!("right-left rotation");
            let new_child = rotate_right(arena, child);
            arena[entry].right = Some(new_child);
        } else {
            trace!("right-right rotation");
        }
        rotate_left(arena, entry)
    } else if factor < -1 {
        let child = match arena[entry].left {
            Some(child) => child,
            None => unreachable!(),
        };
        if balance_factor(arena, child) > 0 {
            trace!("left-right rotation");
            let new_child = rotate_left(arena, child);
            arena[entry].left = Some(new_child);
        } else {
            trace!("left-left rotation");
        }
        rotate_right(arena, entry)
    } else {
        entry
    }
}

/// Inserts `value` into `tree`, rebalancing every ancestor of the new leaf. Returns `value` back
/// without touching the tree if an equal value is already present.
pub fn insert<T>(arena: &mut Arena<T>, tree: &mut Tree, value: T) -> Result<(), T>
where
    T: Ord,
{
    let entry = match *tree {
        Some(entry) => entry,
        None => {
            trace!("creating leaf");
            *tree = Some(arena.allocate(Node::new(value)));
            return Ok(());
        },
    };

    match value.cmp(&arena[entry].value) {
        Ordering::Less => {
            let mut left = arena[entry].left;
            insert(arena, &mut left, value)?;
            arena[entry].left = left;
        },
        Ordering::Greater => {
            let mut right = arena[entry].right;
            insert(arena, &mut right, value)?;
            arena[entry].right = right;
        },
        Ordering::Equal => return Err(value),
    }

    *tree = Some(balance(arena, entry));
    Ok(())
}

// precondition: `tree` is not empty
fn remove_min<T>(arena: &mut Arena<T>, tree: &mut Tree) -> T {
    let entry = match *tree {
        Some(entry) => entry,
        None => unreachable!(),
    };

    match arena[entry].left {
        Some(_) => {
            let mut left = arena[entry].left;
            let ret = remove_min(arena, &mut left);
            arena[entry].left = left;
            *tree = Some(balance(arena, entry));
            ret
        },
        None => {
            let node = arena.free(&entry);
            *tree = node.right;
            node.value
        },
    }
}

// precondition: `tree` is not empty
fn remove_max<T>(arena: &mut Arena<T>, tree: &mut Tree) -> T {
    let entry = match *tree {
        Some(entry) => entry,
        None => unreachable!(),
    };

    match arena[entry].right {
        Some(_) => {
            let mut right = arena[entry].right;
            let ret = remove_max(arena, &mut right);
            arena[entry].right = right;
            *tree = Some(balance(arena, entry));
            ret
        },
        None => {
            let node = arena.free(&entry);
            *tree = node.left;
            node.value
        },
    }
}

/// Removes the value equal to `key` from `tree` and returns it, rebalancing every ancestor on
/// the way back up. Returns `None` without touching the tree if no such value exists.
pub fn remove<T, V>(arena: &mut Arena<T>, tree: &mut Tree, key: &V) -> Option<T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let entry = (*tree)?;

    let ret = match key.cmp(arena[entry].value.borrow()) {
        Ordering::Less => {
            let mut left = arena[entry].left;
            let ret = remove(arena, &mut left, key)?;
            arena[entry].left = left;
            ret
        },
        Ordering::Greater => {
            let mut right = arena[entry].right;
            let ret = remove(arena, &mut right, key)?;
            arena[entry].right = right;
            ret
        },
        Ordering::Equal => {
            let (left, right) = (arena[entry].left, arena[entry].right);
            match (left, right) {
                (_, None) => {
                    trace!("splicing node into its left child");
                    *tree = left;
                    return Some(arena.free(&entry).value);
                },
                (None, _) => {
                    trace!("splicing node into its right child");
                    *tree = right;
                    return Some(arena.free(&entry).value);
                },
                (Some(_), Some(_)) => {
                    // the replacement comes from the taller side, the left one on ties
                    let replacement = if height(arena, left) >= height(arena, right) {
                        trace!("replacing node with maximum of left subtree");
                        let mut left = left;
                        let replacement = remove_max(arena, &mut left);
                        arena[entry].left = left;
                        replacement
                    } else {
                        trace!("replacing node with minimum of right subtree");
                        let mut right = right;
                        let replacement = remove_min(arena, &mut right);
                        arena[entry].right = right;
                        replacement
                    };
                    mem::replace(&mut arena[entry].value, replacement)
                },
            }
        },
    };

    *tree = Some(balance(arena, entry));
    Some(ret)
}

pub fn get<'a, T, V>(arena: &'a Arena<T>, tree: Tree, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut curr = tree;
    while let Some(entry) = curr {
        let node = &arena[entry];
        curr = match key.cmp(node.value.borrow()) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return Some(&node.value),
        };
    }
    None
}

pub fn ceil<'a, T, V>(arena: &'a Arena<T>, tree: Tree, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        match key.cmp(node.value.borrow()) {
            Ordering::Greater => ceil(arena, node.right, key),
            Ordering::Less => match ceil(arena, node.left, key) {
                None => Some(&node.value),
                res => res,
            },
            Ordering::Equal => Some(&node.value),
        }
    })
}

pub fn floor<'a, T, V>(arena: &'a Arena<T>, tree: Tree, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        match key.cmp(node.value.borrow()) {
            Ordering::Less => floor(arena, node.left, key),
            Ordering::Greater => match floor(arena, node.right, key) {
                None => Some(&node.value),
                res => res,
            },
            Ordering::Equal => Some(&node.value),
        }
    })
}

pub fn min<T>(arena: &Arena<T>, tree: Tree) -> Option<&T> {
    tree.map(|entry| {
        let mut curr = &arena[entry];
        while let Some(left) = curr.left {
            curr = &arena[left];
        }
        &curr.value
    })
}

pub fn max<T>(arena: &Arena<T>, tree: Tree) -> Option<&T> {
    tree.map(|entry| {
        let mut curr = &arena[entry];
        while let Some(right) = curr.right {
            curr = &arena[right];
        }
        &curr.value
    })
}

/// Checks that every node orders correctly against its direct children.
pub fn is_ordered<T>(arena: &Arena<T>, tree: Tree) -> bool
where
    T: Ord,
{
    match tree {
        None => true,
        Some(entry) => {
            let node = &arena[entry];
            let left_ok = node.left.map_or(true, |left| arena[left].value < node.value);
            let right_ok = node.right.map_or(true, |right| arena[right].value > node.value);
            left_ok && right_ok && is_ordered(arena, node.left) && is_ordered(arena, node.right)
        },
    }
}

/// Checks stored heights and balance factors against the children and returns the number of
/// nodes in `tree`, or `None` if any node is inconsistent or out of balance.
pub fn count_balanced<T>(arena: &Arena<T>, tree: Tree) -> Option<usize> {
    match tree {
        None => Some(0),
        Some(entry) => {
            let node = &arena[entry];
            let left_count = count_balanced(arena, node.left)?;
            let right_count = count_balanced(arena, node.right)?;
            let left_height = height(arena, node.left);
            let right_height = height(arena, node.right);
            let consistent = node.height == 1 + cmp::max(left_height, right_height)
                && node.balance_factor == right_height - left_height
                && node.balance_factor.abs() <= 1;
            if consistent {
                Some(left_count + right_count + 1)
            } else {
                None
            }
        },
    }
}
