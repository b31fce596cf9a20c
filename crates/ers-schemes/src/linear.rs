//! `Linear`: no cover structure — every point is its own label. Exact
//! recall, one token per queried point.

use std::collections::BTreeMap;

use ers_crypto::Key;
use ers_types::{HyperRange, Point};

use crate::common::{labeled_from_ranges, EmmCore};
use crate::error::SchemeError;
use crate::Scheme;

pub struct Linear {
    domain: HyperRange,
    core: EmmCore,
}

impl Linear {
    pub fn new(domain: HyperRange) -> Self {
        Self { domain, core: EmmCore::new() }
    }
}

impl Scheme for Linear {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_from_ranges(plaintext, |p| vec![HyperRange::singleton(p.clone())]);
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        Ok(query
            .points()
            .into_iter()
            .map(|p| self.core.token(key, &HyperRange::singleton(p).to_bytes()))
            .collect())
    }

    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.search(tokens)
    }

    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.resolve(key, ciphertexts)
    }
}
