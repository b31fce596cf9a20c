//! Errors raised while constructing a Hilbert curve or scaler.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HilbertError {
    #[error("a Hilbert curve needs at least one dimension")]
    ZeroDimensions,

    #[error("a Hilbert curve needs at least one bit per axis")]
    ZeroBits,

    #[error("bits * dims = {0} exceeds the 128-bit distance space")]
    DistanceSpaceOverflow(usize),

    #[error("downscale amount {b} must leave at least one bit of {bits}")]
    DownscaleLeavesNoBits { bits: u32, b: u32 },
}
