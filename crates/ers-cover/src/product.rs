//! Composition of `d` independent one-dimensional [`RangeCoverTree`]s into a
//! `d`-dimensional cover via Cartesian product — the structure behind the
//! `RangeBRC` scheme family.

use ers_types::{HyperRange, Point};

use crate::divider::{AxisStrategy, Divider};
use crate::error::CoverError;
use crate::tree::RangeCoverTree;

pub struct RangeCoverTreeProduct {
    axes: Vec<RangeCoverTree>,
}

impl RangeCoverTreeProduct {
    /// One uniform-split 1-D tree per axis of `domain`.
    pub fn build_uniform(domain: &HyperRange, n: usize) -> Result<Self, CoverError> {
        let per_axis = vec![AxisStrategy::Uniform(n); domain.dimensions()];
        Self::build(domain, per_axis)
    }

    /// Builds one axis-projected tree per dimension, each split with its
    /// own [`AxisStrategy`] — lets callers mix fan-outs or use
    /// data-dependent splits per axis.
    pub fn build(domain: &HyperRange, per_axis: Vec<AxisStrategy>) -> Result<Self, CoverError> {
        if per_axis.len() != domain.dimensions() {
            return Err(ers_types::ErsError::DimensionMismatch {
                expected: domain.dimensions(),
                got: per_axis.len(),
            }
            .into());
        }
        let mut axes = Vec::with_capacity(domain.dimensions());
        for (axis, strategy) in per_axis.into_iter().enumerate() {
            let axis_domain = HyperRange::from_coords(
                vec![domain.start().get(axis)],
                vec![domain.end().get(axis)],
            )
            .expect("axis projection of a valid range is itself valid");
            let divider = Divider::new(vec![strategy]);
            axes.push(RangeCoverTree::build(axis_domain, &divider)?);
        }
        Ok(Self { axes })
    }

    pub fn dims(&self) -> usize {
        self.axes.len()
    }

    /// The insertion cover: the Cartesian product of each axis's own
    /// `descend` path, re-combined into `d`-dimensional ranges. Every
    /// combination is an ancestor-or-equal of `point`'s containing leaf.
    pub fn descend(&self, point: &Point) -> Vec<HyperRange> {
        let per_axis: Vec<Vec<(u64, u64)>> = self
            .axes
            .iter()
            .enumerate()
            .map(|(axis, tree)| {
                let single_axis_point = Point::new(vec![point.get(axis)]);
                tree.descend(&single_axis_point)
                    .into_iter()
                    .map(|r| (r.start().get(0), r.end().get(0)))
                    .collect()
            })
            .collect();
        cartesian_product(&per_axis)
    }

    /// The best range cover of `query`: the Cartesian product of each
    /// axis's own 1-D BRC of `query`'s projection onto that axis.
    pub fn brc(&self, query: &HyperRange) -> Vec<HyperRange> {
        let per_axis: Vec<Vec<(u64, u64)>> = self
            .axes
            .iter()
            .enumerate()
            .map(|(axis, tree)| {
                let axis_query = HyperRange::from_coords(
                    vec![query.start().get(axis)],
                    vec![query.end().get(axis)],
                )
                .expect("axis projection of a valid range is itself valid");
                tree.brc(&axis_query)
                    .into_iter()
                    .map(|r| (r.start().get(0), r.end().get(0)))
                    .collect()
            })
            .collect();
        cartesian_product(&per_axis)
    }

    /// Single range cover: the Cartesian product of each axis's own 1-D SRC
    /// of `query`'s projection onto that axis. `None` if any axis's
    /// projection is not covered by its tree's domain.
    pub fn src(&self, query: &HyperRange) -> Option<HyperRange> {
        let mut start = Vec::with_capacity(self.axes.len());
        let mut end = Vec::with_capacity(self.axes.len());
        for (axis, tree) in self.axes.iter().enumerate() {
            let axis_query = HyperRange::from_coords(
                vec![query.start().get(axis)],
                vec![query.end().get(axis)],
            )
            .expect("axis projection of a valid range is itself valid");
            let axis_src = tree.src(&axis_query)?;
            start.push(axis_src.start().get(0));
            end.push(axis_src.end().get(0));
        }
        Some(HyperRange::from_coords(start, end).expect("axis bounds preserve lo <= hi"))
    }
}

fn cartesian_product(per_axis: &[Vec<(u64, u64)>]) -> Vec<HyperRange> {
    let mut coords: Vec<Vec<(u64, u64)>> = vec![Vec::new()];
    for axis_splits in per_axis {
        let mut next = Vec::with_capacity(coords.len() * axis_splits.len());
        for prefix in &coords {
            for &bound in axis_splits {
                let mut c = prefix.clone();
                c.push(bound);
                next.push(c);
            }
        }
        coords = next;
    }
    coords
        .into_iter()
        .map(|bounds| {
            let start = bounds.iter().map(|&(lo, _)| lo).collect();
            let end = bounds.iter().map(|&(_, hi)| hi).collect();
            HyperRange::from_coords(start, end).expect("axis bounds preserve lo <= hi")
        })
        .collect()
}
