//! Errors surfaced by scheme operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("index has not been built yet")]
    IndexNotBuilt,

    #[error("query is not a subset of the index's domain")]
    QueryOutOfDomain,

    #[error("Hilbert distance domain requires bits*dims <= 64 (got bits={bits}, dims={dims})")]
    DistanceDomainTooWide { bits: u32, dims: usize },

    #[error(transparent)]
    Cover(#[from] ers_cover::CoverError),

    #[error(transparent)]
    Geometry(#[from] ers_types::ErsError),

    #[error(transparent)]
    Emm(#[from] ers_crypto::EmmError),

    #[error(transparent)]
    Hilbert(#[from] ers_hilbert::HilbertError),
}
