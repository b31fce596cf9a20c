//! Errors raised while building or querying a range-cover tree.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoverError {
    /// A divider produced a child identical to its parent while also
    /// producing other children — it made no progress and the tree would
    /// never terminate were the caller to keep recursing into that child.
    #[error("divider returned a child equal to its parent at range {0:?}")]
    NonterminatingDivider(Vec<u64>),

    #[error(transparent)]
    Geometry(#[from] ers_types::ErsError),
}
