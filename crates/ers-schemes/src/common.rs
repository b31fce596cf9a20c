//! Shared EMM plumbing used by every concrete scheme: turn a
//! `label -> list<value>` plaintext map into an [`EncryptedDb`], and turn a
//! token list back into decrypted values.

use std::collections::BTreeMap;

use ers_crypto::{EmmEngine, EncryptedDb, Key};
use ers_types::{HyperRange, Point};

use crate::error::SchemeError;

/// Runs `descend` over every plaintext point, appending that point's values
/// to every returned label. Shared by every non-Hilbert scheme's
/// `build_index`: only the choice of `descend` differs between them.
pub(crate) fn labeled_from_ranges<F>(
    plaintext: &BTreeMap<Point, Vec<Vec<u8>>>,
    mut ranges_for: F,
) -> BTreeMap<Vec<u8>, Vec<Vec<u8>>>
where
    F: FnMut(&Point) -> Vec<HyperRange>,
{
    let mut labeled: BTreeMap<Vec<u8>, Vec<Vec<u8>>> = BTreeMap::new();
    for (point, values) in plaintext {
        for range in ranges_for(point) {
            labeled.entry(range.to_bytes()).or_default().extend(values.iter().cloned());
        }
    }
    labeled
}

/// The build/token/search/resolve plumbing shared by every non-Hilbert
/// scheme. Holds only the server-visible [`EncryptedDb`] — the master key
/// is never stored here, only ever passed in by the caller on the
/// operations that actually need it (`build`, `token`, `resolve`); `search`
/// needs no key at all, matching the server's view of the protocol.
pub(crate) struct EmmCore {
    db: Option<EncryptedDb>,
}

impl EmmCore {
    pub(crate) fn new() -> Self {
        Self { db: None }
    }

    pub(crate) fn build(&mut self, key: &Key, plaintext: &BTreeMap<Vec<u8>, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        self.db = Some(EmmEngine::from_master_key(key).build(plaintext)?);
        Ok(())
    }

    pub(crate) fn token(&self, key: &Key, label: &[u8]) -> [u8; 32] {
        EmmEngine::from_master_key(key).token(label)
    }

    pub(crate) fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        let db = self.db.as_ref().ok_or(SchemeError::IndexNotBuilt)?;
        Ok(tokens
            .iter()
            .flat_map(|token| EmmEngine::search(db, token))
            .map(|blob| blob.to_vec())
            .collect())
    }

    pub(crate) fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        let engine = EmmEngine::from_master_key(key);
        let refs: Vec<&[u8]> = ciphertexts.iter().map(|c| c.as_slice()).collect();
        Ok(engine.resolve(&refs)?)
    }
}
