//! Optional pre-Hilbert coordinate downscaling.
//!
//! Projecting a wide range straight onto a high-precision Hilbert curve can
//! produce an unmanageable number of boundary points. The scaler folds each
//! axis down to `bits - b` bits before projection, then the resulting 1-D
//! sub-ranges are upscaled back to the full distance space once the curve
//! walk is done.

use ers_types::{HyperRange, Point};

use crate::HilbertError;

/// Folds a `bits`-wide axis down by `b` bits, and the reverse.
#[derive(Clone, Copy, Debug)]
pub struct Scaler {
    bits: u32,
    b: u32,
}

impl Scaler {
    pub fn new(bits: u32, b: u32) -> Result<Self, HilbertError> {
        if b >= bits {
            return Err(HilbertError::DownscaleLeavesNoBits { bits, b });
        }
        Ok(Self { bits, b })
    }

    pub fn downscaled_bits(&self) -> u32 {
        self.bits - self.b
    }

    pub fn bits_removed(&self) -> u32 {
        self.b
    }

    /// Folds a single coordinate down to `bits - b` bits.
    ///
    /// Applies `half + (val mod half)` once per removed bit, with `half`
    /// halving each iteration from `2^(bits-1)` down to `2^(bits-b)`. This
    /// forces the top `b` bits to one while leaving the low `bits - b` bits
    /// untouched, so the caller-visible result is the low `bits - b` bits
    /// of `val` — a modulo-based fold, not the usual shift-away-the-low-bits
    /// rounding a naive downscale would use. Kept exactly in this form
    /// because callers rely on the low-bit preservation, not just the final
    /// masked value.
    pub fn downscale(&self, val: u64) -> u64 {
        let mut v = val;
        let mut k = self.bits;
        for _ in 0..self.b {
            let half = 1u64 << (k - 1);
            v = half + (v % half);
            k -= 1;
        }
        let mask = (1u64 << self.downscaled_bits()) - 1;
        v & mask
    }

    /// Downscales both corners of `range` axis-wise, then expands the
    /// result by one cell per axis (clamped to the downscaled domain) to
    /// compensate for points the fold could otherwise exclude.
    pub fn downscale_range(&self, range: &HyperRange) -> HyperRange {
        let max = (1u64 << self.downscaled_bits()) - 1;
        let start: Vec<u64> = range
            .start()
            .coords()
            .iter()
            .map(|&c| self.downscale(c).saturating_sub(1))
            .collect();
        let end: Vec<u64> = range
            .end()
            .coords()
            .iter()
            .map(|&c| (self.downscale(c) + 1).min(max))
            .collect();
        HyperRange::new(Point::new(start), Point::new(end))
            .expect("downscaled corners preserve start <= end")
    }

    /// Upscales a 1-D Hilbert distance range computed over the downscaled
    /// `bits - b` curve back to the full `bits`-bit curve over `dims` axes:
    /// left-shift by `b * dims`, since each of the `dims` axes lost `b`
    /// bits of precision.
    pub fn upscale_distance(&self, distance: u128, dims: usize) -> u128 {
        distance << (self.b as usize * dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downscale_preserves_the_low_bits() {
        let scaler = Scaler::new(8, 3).unwrap();
        for val in 0u64..256 {
            assert_eq!(scaler.downscale(val), val % 32);
        }
    }

    #[test]
    fn downscaled_range_still_orders_start_before_end() {
        let scaler = Scaler::new(8, 3).unwrap();
        let range = HyperRange::from_coords(vec![10, 200], vec![50, 250]).unwrap();
        let down = scaler.downscale_range(&range);
        assert!(down.start().get(0) <= down.end().get(0));
        assert!(down.start().get(1) <= down.end().get(1));
    }

    #[test]
    fn upscale_is_a_left_shift_by_b_times_dims() {
        let scaler = Scaler::new(8, 3).unwrap();
        assert_eq!(scaler.upscale_distance(1, 2), 1u128 << 6);
    }
}
