//! Axis-aligned hyperrectangle over integer lattice points.

use std::cmp::Ordering;

use crate::error::ErsError;
use crate::point::{read_varint, write_varint, Point};

/// A pair `(start, end)` of same-dimension points with `start[i] <= end[i]`
/// on every axis. The fundamental label of the range-cover index: every
/// node of a [`RangeCoverTree`](../../ers_cover/struct.RangeCoverTree.html)
/// is a `HyperRange`, and its canonical byte form is the wire label
/// handed to the EMM engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HyperRange {
    start: Point,
    end: Point,
}

impl HyperRange {
    /// Builds a range from two points, checking dimension consistency and
    /// that `start[i] <= end[i]` on every axis.
    pub fn new(start: Point, end: Point) -> Result<Self, ErsError> {
        if start.dimensions() != end.dimensions() {
            return Err(ErsError::DimensionMismatch {
                expected: start.dimensions(),
                got: end.dimensions(),
            });
        }
        if (0..start.dimensions()).any(|i| start.get(i) > end.get(i)) {
            return Err(ErsError::InvalidRange {
                start: start.coords().to_vec(),
                end: end.coords().to_vec(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn from_coords(start: Vec<u64>, end: Vec<u64>) -> Result<Self, ErsError> {
        Self::new(Point::new(start), Point::new(end))
    }

    /// A range containing exactly one point.
    pub fn singleton(point: Point) -> Self {
        Self {
            end: point.clone(),
            start: point,
        }
    }

    /// The full domain `[0,...,0] - [2^b1-1, 2^b2-1, ...]` for the given
    /// per-axis bit widths.
    pub fn from_bits(bits: &[u32]) -> Result<Self, ErsError> {
        let start = vec![0u64; bits.len()];
        let end = bits
            .iter()
            .map(|&b| (1u64 << b).saturating_sub(1))
            .collect();
        Self::from_coords(start, end)
    }

    pub fn start(&self) -> &Point {
        &self.start
    }

    pub fn end(&self) -> &Point {
        &self.end
    }

    pub fn dimensions(&self) -> usize {
        self.start.dimensions()
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        if point.dimensions() != self.dimensions() {
            return false;
        }
        (0..self.dimensions()).all(|i| self.start.get(i) <= point.get(i) && point.get(i) <= self.end.get(i))
    }

    pub fn contains_range(&self, other: &HyperRange) -> bool {
        self.contains_point(&other.start) && self.contains_point(&other.end)
    }

    /// `volume = prod(end[i] - start[i] + 1)`.
    pub fn volume(&self) -> u64 {
        (0..self.dimensions())
            .map(|i| self.end.get(i) - self.start.get(i) + 1)
            .product()
    }

    /// Every lattice point inside the range. Only meaningful at small
    /// scales — used by the `Linear` scheme and by tests.
    pub fn points(&self) -> Vec<Point> {
        let mut axes: Vec<Vec<u64>> = (0..self.dimensions())
            .map(|i| (self.start.get(i)..=self.end.get(i)).collect())
            .collect();
        if axes.iter().any(|a| a.is_empty()) {
            return Vec::new();
        }
        let mut result = vec![Vec::new()];
        for axis in axes.drain(..) {
            let mut next = Vec::with_capacity(result.len() * axis.len());
            for prefix in &result {
                for &v in &axis {
                    let mut coords = prefix.clone();
                    coords.push(v);
                    next.push(coords);
                }
            }
            result = next;
        }
        result.into_iter().map(Point::new).collect()
    }

    /// All lattice points lying on any `(d-1)`-face of the range: the
    /// corners, plus every interior lattice point on an edge joining two
    /// corners that differ in exactly one axis.
    ///
    /// For `d = 1` the range degenerates to its two endpoints.
    pub fn boundary_points(&self) -> Vec<Point> {
        let d = self.dimensions();
        if d == 1 {
            if self.start == self.end {
                return vec![self.start.clone()];
            }
            return vec![self.start.clone(), self.end.clone()];
        }

        let mut corners: Vec<Vec<u64>> = vec![Vec::new()];
        for i in 0..d {
            let mut next = Vec::with_capacity(corners.len() * 2);
            for prefix in &corners {
                for &v in &[self.start.get(i), self.end.get(i)] {
                    let mut coords = prefix.clone();
                    coords.push(v);
                    next.push(coords);
                }
            }
            corners = next;
        }
        corners.sort();
        corners.dedup();

        let mut points: Vec<Point> = corners.iter().cloned().map(Point::new).collect();

        for i in 0..corners.len() {
            for j in (i + 1)..corners.len() {
                let mut diff_index = None;
                let mut diffs = 0;
                for (axis, (a, b)) in corners[i].iter().zip(corners[j].iter()).enumerate() {
                    if a != b {
                        diff_index = Some(axis);
                        diffs += 1;
                    }
                }
                if diffs != 1 {
                    continue;
                }
                let axis = diff_index.unwrap();
                let (lo, hi) = (
                    corners[i][axis].min(corners[j][axis]),
                    corners[i][axis].max(corners[j][axis]),
                );
                for v in (lo + 1)..hi {
                    let mut coords = corners[i].clone();
                    coords[axis] = v;
                    points.push(Point::new(coords));
                }
            }
        }

        points
    }

    /// Canonical byte encoding: length-prefixed varint coordinate
    /// sequences for `start` then `end`. Injective — no two distinct
    /// ranges serialize to the same bytes. This is the frozen wire format
    /// between `build_index` and `trapdoor`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let start_bytes = self.start.to_bytes();
        let end_bytes = self.end.to_bytes();
        write_varint(start_bytes.len() as u64, &mut out);
        out.extend_from_slice(&start_bytes);
        write_varint(end_bytes.len() as u64, &mut out);
        out.extend_from_slice(&end_bytes);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut cursor = 0usize;
        let start_len = read_varint(bytes, &mut cursor)? as usize;
        let start = Point::from_bytes(bytes.get(cursor..cursor + start_len)?)?;
        cursor += start_len;
        let end_len = read_varint(bytes, &mut cursor)? as usize;
        let end = Point::from_bytes(bytes.get(cursor..cursor + end_len)?)?;
        HyperRange::new(start, end).ok()
    }
}

impl PartialOrd for HyperRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HyperRange {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.start, &self.end).cmp(&(&other.start, &other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: Vec<u64>, end: Vec<u64>) -> HyperRange {
        HyperRange::from_coords(start, end).unwrap()
    }

    #[test]
    fn rejects_inverted_coordinates() {
        assert!(HyperRange::from_coords(vec![2, 0], vec![1, 1]).is_err());
    }

    #[test]
    fn rejects_dimension_mismatch() {
        assert!(HyperRange::from_coords(vec![0, 0], vec![1, 1, 1]).is_err());
    }

    #[test]
    fn from_bits_is_the_full_domain() {
        let r = HyperRange::from_bits(&[2, 3]).unwrap();
        assert_eq!(r.start().coords(), &[0, 0]);
        assert_eq!(r.end().coords(), &[3, 7]);
    }

    #[test]
    fn volume_counts_inclusive_lattice_points() {
        let r = range(vec![0, 0], vec![1, 2]);
        assert_eq!(r.volume(), 2 * 3);
    }

    #[test]
    fn contains_point_and_range() {
        let outer = range(vec![0, 0], vec![10, 10]);
        let inner = range(vec![2, 2], vec![4, 4]);
        assert!(outer.contains_point(&Point::new(vec![5, 5])));
        assert!(!outer.contains_point(&Point::new(vec![11, 5])));
        assert!(outer.contains_range(&inner));
        assert!(!inner.contains_range(&outer));
    }

    #[test]
    fn boundary_points_1d_is_degenerate_pair() {
        let r = range(vec![3], vec![7]);
        let mut b = r.boundary_points();
        b.sort();
        assert_eq!(b, vec![Point::new(vec![3]), Point::new(vec![7])]);
    }

    #[test]
    fn boundary_points_1d_unit_range() {
        let r = range(vec![3], vec![3]);
        assert_eq!(r.boundary_points(), vec![Point::new(vec![3])]);
    }

    #[test]
    fn boundary_points_2d_traces_the_four_edges() {
        let r = range(vec![0, 0], vec![2, 2]);
        let b = r.boundary_points();
        // 9 lattice points total in the 3x3 square; only the center is interior.
        assert_eq!(b.len(), 8);
        assert!(!b.contains(&Point::new(vec![1, 1])));
        assert!(b.contains(&Point::new(vec![0, 0])));
        assert!(b.contains(&Point::new(vec![1, 0])));
    }

    #[test]
    fn points_enumerates_full_range() {
        let r = range(vec![0, 0], vec![1, 1]);
        assert_eq!(r.points().len(), 4);
    }

    #[test]
    fn byte_form_is_injective() {
        let a = range(vec![0, 0], vec![1, 1]);
        let b = range(vec![0, 0], vec![1, 2]);
        assert_ne!(a.to_bytes(), b.to_bytes());
        assert_eq!(HyperRange::from_bytes(&a.to_bytes()).unwrap(), a);
    }
}
