//! Data-dependent variants of `RangeBRC` and `QuadSRC`: the divider's split
//! points are chosen from a training dataset's empirical distribution at
//! build time, then frozen as part of the index.

use std::collections::BTreeMap;

use ers_cover::{AxisStrategy, Divider, RangeCoverTree, RangeCoverTreeProduct};
use ers_crypto::Key;
use ers_types::{HyperRange, Point};

use crate::common::{labeled_from_ranges, EmmCore};
use crate::error::SchemeError;
use crate::Scheme;

pub struct DataDependentRangeBrc {
    domain: HyperRange,
    product: RangeCoverTreeProduct,
    core: EmmCore,
}

impl DataDependentRangeBrc {
    pub fn new(domain: HyperRange, dataset: &[Point], fan_out: usize) -> Result<Self, SchemeError> {
        let per_axis = (0..domain.dimensions())
            .map(|axis| AxisStrategy::DataDependent {
                n: fan_out,
                values: dataset.iter().map(|p| p.get(axis)).collect(),
            })
            .collect();
        let product = RangeCoverTreeProduct::build(&domain, per_axis)?;
        Ok(Self { domain, product, core: EmmCore::new() })
    }
}

impl Scheme for DataDependentRangeBrc {
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

pub struct DataDependentQuadSrc {
    domain: HyperRange,
    tree: RangeCoverTree,
    core: EmmCore,
}

impl DataDependentQuadSrc {
    pub fn new(domain: HyperRange, dataset: &[Point], fan_out: usize) -> Result<Self, SchemeError> {
        let divider = Divider::data_dependent(dataset, fan_out);
        let tree = RangeCoverTree::build(domain.clone(), &divider)?;
        Ok(Self { domain, tree, core: EmmCore::new() })
    }
}

impl Scheme for DataDependentQuadSrc {
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
