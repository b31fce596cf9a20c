//! The symmetric encrypted multi-map (EMM) engine: a KDF/HMAC/AEAD wrapper
//! that turns a plaintext `label -> list<value>` map into an opaque,
//! server-storable [`EncryptedDb`], and turns a label back into the token
//! used to probe it.
//!
//! Grounded on the Argon2id + AES-256-GCM wallet-file cipher this workspace
//! already carried, generalized from a single password-protected blob to a
//! keyed multi-map: one HMAC-SHA256 derives per-label tokens, one AES-256-GCM
//! key seals every value, and `SHA-256(token || i)` spreads the values under
//! a label across distinct, unlinkable ciphertext labels.

mod emm;
mod error;

pub use emm::{setup, EmmEngine, EncryptedDb, Key};
pub use error::EmmError;
