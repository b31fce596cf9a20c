//! Errors raised by the encrypted multi-map engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmmError {
    #[error("index is corrupt: {0}")]
    CorruptIndex(String),

    #[error("ciphertext failed authentication — tampering detected")]
    Tampering,
}
