//! Per-axis split strategies, composed across axes by [`Divider`] into the
//! children of one range-cover tree node.

use ers_types::HyperRange;

use crate::error::CoverError;

/// How a single axis `[lo, hi]` gets split into child sub-intervals.
#[derive(Clone, Debug)]
pub enum AxisStrategy {
    /// Split into (up to) `n` chunks of as-equal-as-possible width; the
    /// first `width % n` chunks absorb the remainder.
    Uniform(usize),
    /// [`AxisStrategy::Uniform`], plus one extra chunk straddling each pair
    /// of adjacent base chunks — built for the TDAG structure, where a
    /// query near a split boundary can be covered by the overlap sibling
    /// instead of climbing back up to the parent.
    UniformMidOverlap(usize),
    /// Splits at the empirical quantile boundaries of `values` restricted
    /// to `[lo, hi]`, so chunks hold roughly equal point counts rather than
    /// equal width. If no value in `values` falls in `[lo, hi]` the axis is
    /// left unsplit — there is nothing to bias the split towards.
    DataDependent { n: usize, values: Vec<u64> },
}

impl AxisStrategy {
    fn split(&self, lo: u64, hi: u64) -> Vec<(u64, u64)> {
        match self {
            AxisStrategy::Uniform(n) => uniform_split(lo, hi, *n),
            AxisStrategy::UniformMidOverlap(n) => uniform_mid_overlap_split(lo, hi, *n),
            AxisStrategy::DataDependent { n, values } => {
                data_dependent_split(lo, hi, *n, values)
            }
        }
    }
}

fn uniform_split(lo: u64, hi: u64, n: usize) -> Vec<(u64, u64)> {
    let width = hi - lo + 1;
    if width <= 1 {
        return vec![(lo, hi)];
    }
    let n = n.clamp(1, width as usize);
    let base = width / n as u64;
    let rem = (width % n as u64) as usize;
    let mut out = Vec::with_capacity(n);
    let mut cur = lo;
    for i in 0..n {
        let w = base + if i < rem { 1 } else { 0 };
        let end = cur + w - 1;
        out.push((cur, end));
        cur = end + 1;
    }
    out
}

fn uniform_mid_overlap_split(lo: u64, hi: u64, n: usize) -> Vec<(u64, u64)> {
    let base = uniform_split(lo, hi, n);
    if base.len() < 2 {
        return base;
    }
    // Walk left to right; after each chunk, insert the chunk offset by half
    // its own width, straddling its boundary with the next chunk. Derived
    // from the chunk's own width (not a coordinate average of two
    // midpoints), matching the TDAG mid-overlap divider this structure is
    // built for.
    let mut sub_ranges = base;
    let mut i = 0usize;
    while i < sub_ranges.len().saturating_sub(1) {
        let (sub_start, sub_end) = sub_ranges[i];
        let this_size = sub_end - sub_start + 1;
        let offset_start = sub_start + this_size / 2;
        let offset_end = offset_start + this_size - 1;
        if offset_end <= hi {
            let child = (offset_start, offset_end);
            if !sub_ranges.contains(&child) {
                sub_ranges.insert(i + 1, child);
                i += 1;
            }
        }
        i += 1;
    }
    sub_ranges
}

fn data_dependent_split(lo: u64, hi: u64, n: usize, values: &[u64]) -> Vec<(u64, u64)> {
    let width = hi - lo + 1;
    if width <= 1 {
        return vec![(lo, hi)];
    }
    let mut vals: Vec<u64> = values.iter().copied().filter(|&v| v >= lo && v <= hi).collect();
    if vals.is_empty() {
        log::warn!("data-dependent divider found no points in [{lo}, {hi}], falling back to a single segment");
        return vec![(lo, hi)];
    }
    vals.sort_unstable();
    vals.dedup();
    let n = n.clamp(1, vals.len());
    if n == 1 {
        return vec![(lo, hi)];
    }

    let mut breakpoints: Vec<u64> = (1..n)
        .map(|k| vals[((k * vals.len()) / n).min(vals.len() - 1)])
        .collect();
    breakpoints.sort_unstable();
    breakpoints.dedup();

    let mut out = Vec::new();
    let mut cur = lo;
    for bp in breakpoints {
        if cur >= hi {
            break;
        }
        let bp = bp.clamp(cur, hi - 1);
        if bp < cur {
            continue;
        }
        out.push((cur, bp));
        cur = bp + 1;
    }
    out.push((cur, hi));
    out
}

/// Composes one [`AxisStrategy`] per axis into the divider of a range-cover
/// tree node: children are the Cartesian product of each axis's split.
#[derive(Clone, Debug)]
pub struct Divider {
    axes: Vec<AxisStrategy>,
}

impl Divider {
    pub fn new(axes: Vec<AxisStrategy>) -> Self {
        assert!(!axes.is_empty());
        Self { axes }
    }

    pub fn uniform(dims: usize, n: usize) -> Self {
        Self::new(vec![AxisStrategy::Uniform(n); dims])
    }

    pub fn uniform_mid_overlap(dims: usize, n: usize) -> Self {
        Self::new(vec![AxisStrategy::UniformMidOverlap(n); dims])
    }

    /// One [`AxisStrategy::DataDependent`] per axis, each fed the dataset's
    /// values projected onto that axis.
    pub fn data_dependent(dataset: &[ers_types::Point], n: usize) -> Self {
        let dims = dataset.first().map(|p| p.dimensions()).unwrap_or(1);
        let axes = (0..dims)
            .map(|axis| AxisStrategy::DataDependent {
                n,
                values: dataset.iter().map(|p| p.get(axis)).collect(),
            })
            .collect();
        Self::new(axes)
    }

    pub fn dims(&self) -> usize {
        self.axes.len()
    }

    /// Divides `range` into its children. Returns `Ok(vec![range.clone()])`
    /// when every axis is a zero-density/width-1 leaf fallback — the caller
    /// treats a single child identical to the parent as a terminal leaf,
    /// not an error. Raises [`CoverError::NonterminatingDivider`] only when
    /// *some but not all* children collapse back to the parent, which means
    /// the divider made inconsistent, non-terminating progress.
    pub fn divide(&self, range: &HyperRange) -> Result<Vec<HyperRange>, CoverError> {
        let per_axis: Vec<Vec<(u64, u64)>> = (0..self.axes.len())
            .map(|axis| self.axes[axis].split(range.start().get(axis), range.end().get(axis)))
            .collect();

        let mut coords: Vec<Vec<(u64, u64)>> = vec![Vec::new()];
        for axis_splits in &per_axis {
            let mut next = Vec::with_capacity(coords.len() * axis_splits.len());
            for prefix in &coords {
                for &(lo, hi) in axis_splits {
                    let mut c = prefix.clone();
                    c.push((lo, hi));
                    next.push(c);
                }
            }
            coords = next;
        }

        let children: Vec<HyperRange> = coords
            .into_iter()
            .map(|bounds| {
                let start = bounds.iter().map(|&(lo, _)| lo).collect();
                let end = bounds.iter().map(|&(_, hi)| hi).collect();
                HyperRange::from_coords(start, end).expect("per-axis splits preserve lo <= hi")
            })
            .collect();

        if children.len() > 1 && children.iter().any(|c| c == range) {
            return Err(CoverError::NonterminatingDivider(range.start().coords().to_vec()));
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_split_distributes_the_remainder() {
        assert_eq!(uniform_split(0, 9, 4), vec![(0, 2), (3, 5), (6, 7), (8, 9)]);
    }

    #[test]
    fn uniform_split_of_a_unit_range_is_itself() {
        assert_eq!(uniform_split(5, 5, 4), vec![(5, 5)]);
    }

    #[test]
    fn mid_overlap_adds_boundary_straddling_chunks() {
        let base = uniform_split(0, 9, 4);
        let merged = uniform_mid_overlap_split(0, 9, 4);
        assert!(merged.len() > base.len());
    }

    #[test]
    fn mid_overlap_split_of_zero_to_three_into_two() {
        assert_eq!(uniform_mid_overlap_split(0, 3, 2), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn data_dependent_falls_back_to_a_single_segment_with_no_points() {
        assert_eq!(data_dependent_split(0, 9, 4, &[]), vec![(0, 9)]);
        assert_eq!(data_dependent_split(0, 9, 4, &[100, 200]), vec![(0, 9)]);
    }

    #[test]
    fn data_dependent_handles_breakpoints_landing_on_the_last_two_values() {
        // Quantile breakpoints can land on hi-1 and hi; the split must
        // still terminate rather than try to build an empty [hi, hi-1].
        let vals: Vec<u64> = (0..=7).collect();
        let splits = data_dependent_split(0, 7, 4, &vals);
        assert_eq!(splits.last().unwrap().1, 7);
        for w in splits.windows(2) {
            assert_eq!(w[0].1 + 1, w[1].0);
        }
    }

    #[test]
    fn data_dependent_partitions_the_whole_range() {
        let vals = vec![1, 1, 2, 3, 3, 3, 7, 8];
        let splits = data_dependent_split(0, 9, 3, &vals);
        assert_eq!(splits[0].0, 0);
        assert_eq!(splits.last().unwrap().1, 9);
        for w in splits.windows(2) {
            assert_eq!(w[0].1 + 1, w[1].0);
        }
    }

    #[test]
    fn divide_produces_a_cartesian_product_of_axis_splits() {
        let divider = Divider::uniform(2, 2);
        let range = HyperRange::from_coords(vec![0, 0], vec![3, 3]).unwrap();
        let children = divider.divide(&range).unwrap();
        assert_eq!(children.len(), 4);
    }
}
