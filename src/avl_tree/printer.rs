//! Text rendering of the shape of an `AvlSet<T>`.

use crate::avl_tree::node::NodeRef;
use std::fmt::Display;

const BRANCH: &str = "├───";
const LAST_BRANCH: &str = "└───";
const CONTINUED: &str = "│   ";
const BLANK: &str = "    ";

/// Renders the subtree rooted at `root` in pre-order, one node per line.
///
/// The root value is on the first line. A left child that has a right sibling is drawn with a
/// `├───` pointer; every other child is drawn with `└───`. An empty tree renders as an empty
/// string.
///
/// # Examples
///
/// ```
/// use avl_collections::avl_tree::{printer, AvlSet};
///
/// let mut set = AvlSet::new();
/// for value in 1..=4 {
///     set.insert(value);
/// }
///
/// assert_eq!(
///     printer::render(set.root()),
///     "2\n├───1\n└───3\n    └───4",
/// );
/// ```
pub fn render<T>(root: Option<NodeRef<T>>) -> String
where
    T: Display,
{
    let mut out = String::new();
    if let Some(root) = root {
        out.push_str(&root.value().to_string());
        render_children(&mut out, "", root);
    }
    out
}

fn render_children<T>(out: &mut String, padding: &str, node: NodeRef<T>)
where
    T: Display,
{
    let right = node.right();
    let left_pointer = if right.is_some() { BRANCH } else { LAST_BRANCH };
    render_node(out, padding, left_pointer, node.left(), right.is_some());
    render_node(out, padding, LAST_BRANCH, right, false);
}

fn render_node<T>(
    out: &mut String,
    padding: &str,
    pointer: &str,
    node: Option<NodeRef<T>>,
    has_right_sibling: bool,
) where
    T: Display,
{
    if let Some(node) = node {
        out.push('\n');
        out.push_str(padding);
        out.push_str(pointer);
        out.push_str(&node.value().to_string());

        let child_padding = if has_right_sibling {
            format!("{}{}", padding, CONTINUED)
        } else {
            format!("{}{}", padding, BLANK)
        };
        render_children(out, &child_padding, node);
    }
}
