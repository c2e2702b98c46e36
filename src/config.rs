use serde_derive::{Deserialize, Serialize};

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Construction-time settings for `AvlSet<T>`.
///
/// `chunk_size` is the number of nodes each arena chunk holds. Missing fields fall back to their
/// defaults when deserializing.
///
/// # Examples
///
/// ```
/// use avl_collections::AvlConfig;
/// use avl_collections::avl_tree::AvlSet;
///
/// let config = AvlConfig { chunk_size: 64 };
/// let mut set = AvlSet::with_config(config);
/// assert!(set.insert(1));
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct AvlConfig {
    pub chunk_size: usize,
}

impl AvlConfig {
    // a zero-sized chunk would never have room for a node
    pub(crate) fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

impl Default for AvlConfig {
    fn default() -> Self {
        AvlConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
