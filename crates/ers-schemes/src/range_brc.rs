//! `RangeBRC`: one uniform-split 1-D tree per axis, composed via Cartesian
//! product. Exact recall; trapdoor via the product's BRC.

use std::collections::BTreeMap;

use ers_cover::RangeCoverTreeProduct;
use ers_crypto::Key;
use ers_types::{HyperRange, Point};

use crate::common::{labeled_from_ranges, EmmCore};
use crate::error::SchemeError;
use crate::Scheme;

pub struct RangeBrc {
    domain: HyperRange,
    product: RangeCoverTreeProduct,
    core: EmmCore,
}

impl RangeBrc {
    pub fn new(domain: HyperRange, fan_out: usize) -> Result<Self, SchemeError> {
        let product = RangeCoverTreeProduct::build_uniform(&domain, fan_out)?;
        Ok(Self { domain, product, core: EmmCore::new() })
    }
}

impl Scheme for RangeBrc {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_from_ranges(plaintext, |p| self.product.descend(p));
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        Ok(self.product.brc(query).iter().map(|r| self.core.token(key, &r.to_bytes())).collect())
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
    fn recall_is_exact() {
        let key = RangeBrc::setup(256);
        let domain = HyperRange::from_coords(vec![0, 0], vec![15, 15]).unwrap();
        let mut scheme = RangeBrc::new(domain, 4).unwrap();
        let mut plaintext = BTreeMap::new();
        plaintext.insert(Point::new(vec![3, 3]), vec![b"a".to_vec()]);
        plaintext.insert(Point::new(vec![12, 12]), vec![b"b".to_vec()]);
        scheme.build_index(&key, &plaintext).unwrap();

        let query = HyperRange::from_coords(vec![0, 0], vec![5, 5]).unwrap();
        let resolved = scheme.query(&key, &query).unwrap();
        assert_eq!(resolved, vec![b"a".to_vec()]);
    }
}
