//! Hilbert-projected variants: points are first projected to a 1-D Hilbert
//! distance, then a 1-D scheme runs over that distance space. Queries are
//! decomposed into 1-D distance ranges by walking the query's boundary
//! (`brc_with_merging` for the exact variants, `src` for the over-covering
//! one), each of which becomes a 1-D cover over the distance tree.
//!
//! The distance tree reuses the `u64`-coordinate cover-tree machinery, so
//! `bits * dims` is required to fit in 64 bits — enough for any domain size
//! the CLI's datasets actually exercise.

use std::collections::BTreeMap;

use ers_cover::{Divider, RangeCoverTree};
use ers_crypto::Key;
use ers_hilbert::{HilbertCurve, Scaler};
use ers_types::{HyperRange, Point};

use crate::common::EmmCore;
use crate::error::SchemeError;
use crate::Scheme;

fn distance_domain(curve: &HilbertCurve) -> Result<HyperRange, SchemeError> {
    if (curve.bits() as usize) * curve.dims() > 64 {
        return Err(SchemeError::DistanceDomainTooWide { bits: curve.bits(), dims: curve.dims() });
    }
    Ok(HyperRange::from_coords(vec![0], vec![curve.max_distance() as u64]).expect("0 <= max_distance"))
}

fn labeled_distances(
    plaintext: &BTreeMap<Point, Vec<Vec<u8>>>,
    curve: &HilbertCurve,
    mut ranges_for: impl FnMut(u64) -> Vec<HyperRange>,
) -> BTreeMap<Vec<u8>, Vec<Vec<u8>>> {
    let mut labeled: BTreeMap<Vec<u8>, Vec<Vec<u8>>> = BTreeMap::new();
    for (point, values) in plaintext {
        let distance = curve.distance_from_point(point) as u64;
        for range in ranges_for(distance) {
            labeled.entry(range.to_bytes()).or_default().extend(values.iter().cloned());
        }
    }
    labeled
}

/// `LinearHilbert`: exact recall via a separate token per individual
/// Hilbert distance touched by `brc_with_merging`.
pub struct LinearHilbert {
    domain: HyperRange,
    curve: HilbertCurve,
    merge_tolerance: u128,
    core: EmmCore,
}

impl LinearHilbert {
    pub fn new(domain: HyperRange, bits: u32, merge_tolerance: u128) -> Result<Self, SchemeError> {
        let curve = HilbertCurve::new(bits, domain.dimensions())?;
        distance_domain(&curve)?;
        Ok(Self { domain, curve, merge_tolerance, core: EmmCore::new() })
    }
}

impl Scheme for LinearHilbert {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_distances(plaintext, &self.curve, |d| {
            vec![HyperRange::singleton(Point::new(vec![d]))]
        });
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        let runs = self.curve.brc_with_merging(query, self.merge_tolerance);
        let mut tokens = Vec::new();
        for run in runs {
            for d in run.lo..=run.hi {
                let label = HyperRange::singleton(Point::new(vec![d as u64]));
                tokens.push(self.core.token(key, &label.to_bytes()));
            }
        }
        Ok(tokens)
    }

    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.search(tokens)
    }

    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.resolve(key, ciphertexts)
    }
}

/// `RangeBRCHilbert`: exact recall via a 1-D uniform-split tree over the
/// distance space, BRC'd against each `brc_with_merging` run.
///
/// When `downscale_bits > 0`, the query is first folded through a
/// [`Scaler`] and walked at reduced precision — fewer boundary points, at
/// the cost of wider (but still correct, thanks to the scaler's ±1
/// expansion) distance runs once upscaled back to full precision.
pub struct RangeBrcHilbert {
    domain: HyperRange,
    curve: HilbertCurve,
    merge_tolerance: u128,
    scaler: Option<(Scaler, HilbertCurve)>,
    tree: RangeCoverTree,
    core: EmmCore,
}

impl RangeBrcHilbert {
    pub fn new(domain: HyperRange, bits: u32, fan_out: usize, merge_tolerance: u128) -> Result<Self, SchemeError> {
        Self::with_downscale(domain, bits, fan_out, merge_tolerance, 0)
    }

    pub fn with_downscale(
        domain: HyperRange,
        bits: u32,
        fan_out: usize,
        merge_tolerance: u128,
        downscale_bits: u32,
    ) -> Result<Self, SchemeError> {
        let curve = HilbertCurve::new(bits, domain.dimensions())?;
        let dist_domain = distance_domain(&curve)?;
        let divider = Divider::uniform(1, fan_out);
        let tree = RangeCoverTree::build(dist_domain, &divider)?;
        let scaler = if downscale_bits > 0 {
            let scaler = Scaler::new(bits, downscale_bits)?;
            let down_curve = HilbertCurve::new(scaler.downscaled_bits(), domain.dimensions())?;
            Some((scaler, down_curve))
        } else {
            None
        };
        Ok(Self { domain, curve, merge_tolerance, scaler, tree, core: EmmCore::new() })
    }

    fn distance_runs(&self, query: &HyperRange) -> Vec<ers_hilbert::DistanceRange> {
        match &self.scaler {
            None => self.curve.brc_with_merging(query, self.merge_tolerance),
            Some((scaler, down_curve)) => {
                let down_query = scaler.downscale_range(query);
                down_curve
                    .brc_with_merging(&down_query, self.merge_tolerance)
                    .into_iter()
                    .map(|run| {
                        ers_hilbert::DistanceRange::new(
                            scaler.upscale_distance(run.lo, down_curve.dims()),
                            scaler.upscale_distance(run.hi, down_curve.dims())
                                + (1u128 << (scaler.bits_removed() as usize * down_curve.dims()))
                                - 1,
                        )
                    })
                    .collect()
            }
        }
    }
}

impl Scheme for RangeBrcHilbert {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_distances(plaintext, &self.curve, |d| {
            self.tree.descend(&Point::new(vec![d]))
        });
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        let runs = self.distance_runs(query);
        let mut tokens = Vec::new();
        for run in runs {
            let run_range = HyperRange::from_coords(
                vec![run.lo as u64],
                vec![(run.hi as u64).min(self.curve.max_distance() as u64)],
            )?;
            for label in self.tree.brc(&run_range) {
                tokens.push(self.core.token(key, &label.to_bytes()));
            }
        }
        Ok(tokens)
    }

    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.search(tokens)
    }

    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.resolve(key, ciphertexts)
    }
}

/// `TdagSRCHilbert`: one over-covering 1-D SRC token per query, over a
/// mid-overlap distance tree. Already an over-covering (false-positives
/// allowed) scheme, so folding the query through a [`Scaler`] first — when
/// `downscale_bits > 0` — only widens an already-approximate cover.
pub struct TdagSrcHilbert {
    domain: HyperRange,
    curve: HilbertCurve,
    scaler: Option<(Scaler, HilbertCurve)>,
    tree: RangeCoverTree,
    core: EmmCore,
}

impl TdagSrcHilbert {
    pub fn new(domain: HyperRange, bits: u32, fan_out: usize) -> Result<Self, SchemeError> {
        Self::with_downscale(domain, bits, fan_out, 0)
    }

    pub fn with_downscale(
        domain: HyperRange,
        bits: u32,
        fan_out: usize,
        downscale_bits: u32,
    ) -> Result<Self, SchemeError> {
        let curve = HilbertCurve::new(bits, domain.dimensions())?;
        let dist_domain = distance_domain(&curve)?;
        let divider = Divider::uniform_mid_overlap(1, fan_out);
        let tree = RangeCoverTree::build(dist_domain, &divider)?;
        let scaler = if downscale_bits > 0 {
            let scaler = Scaler::new(bits, downscale_bits)?;
            let down_curve = HilbertCurve::new(scaler.downscaled_bits(), domain.dimensions())?;
            Some((scaler, down_curve))
        } else {
            None
        };
        Ok(Self { domain, curve, scaler, tree, core: EmmCore::new() })
    }
}

impl Scheme for TdagSrcHilbert {
    fn build_index(&mut self, key: &Key, plaintext: &BTreeMap<Point, Vec<Vec<u8>>>) -> Result<(), SchemeError> {
        let labeled = labeled_distances(plaintext, &self.curve, |d| {
            self.tree.descend(&Point::new(vec![d]))
        });
        self.core.build(key, &labeled)
    }

    fn trapdoor(&self, key: &Key, query: &HyperRange) -> Result<Vec<[u8; 32]>, SchemeError> {
        if !self.domain.contains_range(query) {
            return Err(SchemeError::QueryOutOfDomain);
        }
        let (lo, hi) = match &self.scaler {
            None => {
                let bound = self.curve.src(query);
                (bound.lo, bound.hi)
            }
            Some((scaler, down_curve)) => {
                let down_query = scaler.downscale_range(query);
                let bound = down_curve.src(&down_query);
                let span = 1u128 << (scaler.bits_removed() as usize * down_curve.dims());
                (
                    scaler.upscale_distance(bound.lo, down_curve.dims()),
                    scaler.upscale_distance(bound.hi, down_curve.dims()) + span - 1,
                )
            }
        };
        let run_range =
            HyperRange::from_coords(vec![lo as u64], vec![(hi as u64).min(self.curve.max_distance() as u64)])?;
        let label = self.tree.src(&run_range).ok_or(SchemeError::QueryOutOfDomain)?;
        Ok(vec![self.core.token(key, &label.to_bytes())])
    }

    fn search(&self, tokens: &[[u8; 32]]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.search(tokens)
    }

    fn resolve(&self, key: &Key, ciphertexts: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, SchemeError> {
        self.core.resolve(key, ciphertexts)
    }
}
