use thiserror::Error;

/// Errors surfaced by `AvlSet<T>` and its cursors.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum AvlError {
    /// The tree was modified after the cursor was created.
    #[error("Tree was modified during iteration: expected {expected} modifications, found {found}")]
    StaleIterator { expected: u64, found: u64 },

    /// The cursor was stepped with a tree other than the one that created it.
    #[error("Cursor was used with a tree other than the one that created it")]
    ForeignTree,

    /// The operation requires at least one element.
    #[error("Operation requires a non-empty tree")]
    EmptyStructure,

    /// Removal through a cursor is not supported.
    #[error("Removal through an in-order cursor is not supported")]
    UnsupportedMutation,
}

pub type AvlResult<T> = Result<T, AvlError>;
