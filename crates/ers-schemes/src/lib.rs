//! Scheme compositions: the glue that picks a cover structure, an optional
//! Hilbert projection, and wires both to the [`ers_crypto`] EMM engine.
//!
//! Every scheme exposes the same five operations — `setup`, `build_index`,
//! `trapdoor`, `search`, `resolve` — through the [`Scheme`] trait; they
//! differ only in how a point maps to labels at build time and how a query
//! maps to a token set at trapdoor time. The master key returned by `setup`
//! is owned by the caller: only `build_index`, `trapdoor`, and `resolve`
//! take it, never anything stored on the scheme itself, so a scheme value
//! is safe to hand to the "server" side of a client/server split — it
//! carries only the encrypted index, not the key.

mod common;
mod data_dependent;
mod error;
mod hilbert;
mod linear;
mod quad;
mod range_brc;
mod tdag_src;

use std::collections::BTreeMap;

pub use ers_crypto::{setup, Key};
use ers_types::{HyperRange, Point};

pub use data_dependent::{DataDependentQuadSrc, DataDependentRangeBrc};
pub use error::SchemeError;
pub use hilbert::{LinearHilbert, RangeBrcHilbert, TdagSrcHilbert};
pub use linear::Linear;
pub use quad::{QuadBrc, QuadSrc};
pub use range_brc::RangeBrc;
pub use tdag_src::TdagSrc;

pub trait Scheme {
    /// `setup(security_bits) -> key`: generates the client's secret master
    /// key. Identical across every scheme, so it carries a default rather
    /// than forcing each struct to reimplement it.
    fn setup(security_bits: u32) -> Key
    where
        Self: Sized,
    {
        ers_crypto::setup(security_bits)
    }

    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError>;
    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError>;
    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError>;
    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError>;

    /// Convenience composition: `trapdoor` then `search` then `resolve`.
    fn query(&self, key: &Key, query: &HyperRange) -> Result<Vec<Vec<u8>>, SchemeError> {
        let tokens = self.trapdoor(key, query)?;
        let ciphertexts = self.search(&tokens)?;
        self.resolve(key, &ciphertexts)
    }
}
