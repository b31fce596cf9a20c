//! `QuadBRC` and `QuadSRC`: a single `d`-dimensional tree with a uniform
//! divider. `QuadBRC` queries via `brc` (exact recall); `QuadSRC` queries
//! via `src` (may over-cover, false positives allowed).

use std::collections::BTreeMap;

use ers_cover::{Divider, RangeCoverTree};
use ers_crypto::Key;
use ers_types::{HyperRange, Point};

use crate::common::{labeled_from_ranges, EmmCore};
use crate::error::SchemeError;
use crate::Scheme;

pub struct QuadBrc {
    domain: HyperRange,
    tree: RangeCoverTree,
    core: EmmCore,
}

impl QuadBrc {
    pub fn new(domain: HyperRange, fan_out: usize) -> Result<Self, SchemeError> {
        let divider = Divider::uniform(domain.dimensions(), fan_out);
        let tree = RangeCoverTree::build(domain.clone(), &divider)?;
        Ok(Self { domain, tree, core: EmmCore::new() })
    }
}

impl Scheme for QuadBrc {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_from_ranges(plaintext, |p| self.tree.descend(p));
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        Ok(self.tree.brc(query).iter().map(|r| self.core.token(key, &r.to_bytes())).collect())
    }

    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.search(tokens)
    }

    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.resolve(key, ciphertexts)
    }
}

pub struct QuadSrc {
    domain: HyperRange,
    tree: RangeCoverTree,
    core: EmmCore,
}

impl QuadSrc {
    pub fn new(domain: HyperRange, fan_out: usize) -> Result<Self, SchemeError> {
        let divider = Divider::uniform(domain.dimensions(), fan_out);
        let tree = RangeCoverTree::build(domain.clone(), &divider)?;
        Ok(Self { domain, tree, core: EmmCore::new() })
    }
}

impl Scheme for QuadSrc {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_from_ranges(plaintext, |p| self.tree.descend(p));
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        let label = self.tree.src(query).ok_or(SchemeError::QueryOutOfDomain)?;
        Ok(vec![self.core.token(key, &label.to_bytes())])
    }

    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.search(tokens)
    }

    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.resolve(key, ciphertexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_brc_has_exact_recall() {
        let key = QuadBrc::setup(256);
        let domain = HyperRange::from_coords(vec![0, 0], vec![15, 15]).unwrap();
        let mut scheme = QuadBrc::new(domain, 2).unwrap();
        let mut plaintext = BTreeMap::new();
        plaintext.insert(Point::new(vec![3, 3]), vec![b"a".to_vec()]);
        plaintext.insert(Point::new(vec![12, 12]), vec![b"b".to_vec()]);
        scheme.build_index(&key, &plaintext).unwrap();

        let query = HyperRange::from_coords(vec![0, 0], vec![5, 5]).unwrap();
        assert_eq!(scheme.query(&key, &query).unwrap(), vec![b"a".to_vec()]);
    }

    #[test]
    fn quad_src_never_misses_a_true_positive() {
        let key = QuadSrc::setup(256);
        let domain = HyperRange::from_coords(vec![0, 0], vec![15, 15]).unwrap();
        let mut scheme = QuadSrc::new(domain, 2).unwrap();
        let mut plaintext = BTreeMap::new();
        plaintext.insert(Point::new(vec![3, 3]), vec![b"a".to_vec()]);
        scheme.build_index(&key, &plaintext).unwrap();

        let query = HyperRange::from_coords(vec![0, 0], vec![5, 5]).unwrap();
        let resolved = scheme.query(&key, &query).unwrap();
        assert!(resolved.contains(&b"a".to_vec()));
    }
}
