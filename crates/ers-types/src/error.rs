//! Core geometry error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErsError {
    #[error("invalid range: start {start:?} is not <= end {end:?} on every axis")]
    InvalidRange { start: Vec<u64>, end: Vec<u64> },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
