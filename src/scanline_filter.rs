//! Per-row filtering and reconstruction.
//!
//! Filters operate on bytes, not samples: a 16-bit sample is two independent
//! bytes as far as prediction is concerned, and the pixel layout only enters
//! through `bpp`, the distance to the byte "to the left". All arithmetic wraps
//! modulo 256 so reconstruction is the exact inverse of filtering.

use crate::filter_type::FilterType;

/// Byte-level predictors shared by the decode and encode paths.
/// `a` is the byte to the left, `b` the byte above, `c` the byte above-left;
/// any of them outside the image is 0.
pub struct ScanlineFilter;

impl ScanlineFilter {
    /// Paeth predictor: whichever of `a`, `b`, `c` is closest to `a + b - c`,
    /// ties resolved in the order a, b, c.
    #[inline]
    pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
        let a16 = a as i16;
        let b16 = b as i16;
        let c16 = c as i16;
        let p = a16 + b16 - c16;
        let pa = (p - a16).unsigned_abs();
        let pb = (p - b16).unsigned_abs();
        let pc = (p - c16).unsigned_abs();
        if pa <= pb && pa <= pc {
            a
        } else if pb <= pc {
            b
        } else {
            c
        }
    }

    #[inline]
    fn average(a: u8, b: u8) -> u8 {
        ((a as u16 + b as u16) / 2) as u8
    }

    /// Reverses `filter` on `row` in place.
    ///
    /// `prior` is the previous *reconstructed* row (all zero for the first row
    /// of a region) and must be as long as `row`. Bytes are processed left to
    /// right since Sub, Average and Paeth read the already reconstructed byte
    /// `bpp` positions back.
    ///
    /// # Panics
    ///
    /// Panics if `prior` and `row` differ in length.
    pub fn reconstruct(filter: FilterType, row: &mut [u8], prior: &[u8], bpp: usize) {
        assert_eq!(row.len(), prior.len(), "prior row length mismatch");
        let bpp = bpp.max(1);
        let len = row.len();
        let lead = bpp.min(len);

        match filter {
            FilterType::None => {}
            FilterType::Sub => {
                for i in bpp..len {
                    row[i] = row[i].wrapping_add(row[i - bpp]);
                }
            }
            FilterType::Up => {
                for (x, b) in row.iter_mut().zip(prior) {
                    *x = x.wrapping_add(*b);
                }
            }
            FilterType::Average => {
                for i in 0..lead {
                    row[i] = row[i].wrapping_add(prior[i] / 2);
                }
                for i in bpp..len {
                    row[i] = row[i].wrapping_add(Self::average(row[i - bpp], prior[i]));
                }
            }
            FilterType::Paeth => {
                // With a = c = 0 the predictor is always b.
                for i in 0..lead {
                    row[i] = row[i].wrapping_add(prior[i]);
                }
                for i in bpp..len {
                    let predictor = Self::paeth_predictor(row[i - bpp], prior[i], prior[i - bpp]);
                    row[i] = row[i].wrapping_add(predictor);
                }
            }
        }
    }

    /// Forward filter: writes the delta encoding of `raw` into `out`.
    ///
    /// `prior` is the previous row's original bytes (zero for the first row).
    ///
    /// # Panics
    ///
    /// Panics if `prior` or `out` is not as long as `raw`.
    pub fn apply(filter: FilterType, raw: &[u8], prior: &[u8], bpp: usize, out: &mut [u8]) {
        assert_eq!(raw.len(), prior.len(), "prior row length mismatch");
        assert_eq!(raw.len(), out.len(), "output row length mismatch");
        let bpp = bpp.max(1);

        for i in 0..raw.len() {
            let a = if i >= bpp { raw[i - bpp] } else { 0 };
            let b = prior[i];
            let c = if i >= bpp { prior[i - bpp] } else { 0 };
            let predictor = match filter {
                FilterType::None => 0,
                FilterType::Sub => a,
                FilterType::Up => b,
                FilterType::Average => Self::average(a, b),
                FilterType::Paeth => Self::paeth_predictor(a, b, c),
            };
            out[i] = raw[i].wrapping_sub(predictor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize, seed: u32) -> Vec<u8> {
        let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 8) as u8
            })
            .collect()
    }

    #[test]
    fn test_none_is_identity() {
        let raw = pattern(24, 1);
        let prior = pattern(24, 2);
        let mut row = raw.clone();
        ScanlineFilter::reconstruct(FilterType::None, &mut row, &prior, 3);
        assert_eq!(row, raw);
    }

    #[test]
    fn test_sub_uses_bpp_stride() {
        let mut row = vec![10, 20, 30, 5, 5, 5];
        ScanlineFilter::reconstruct(FilterType::Sub, &mut row, &[0; 6], 3);
        assert_eq!(row, vec![10, 20, 30, 15, 25, 35]);
    }

    #[test]
    fn test_wraparound() {
        let mut row = vec![200, 100];
        ScanlineFilter::reconstruct(FilterType::Sub, &mut row, &[0, 0], 1);
        assert_eq!(row, vec![200, 44]);

        let mut row = vec![255];
        ScanlineFilter::reconstruct(FilterType::Up, &mut row, &[2], 1);
        assert_eq!(row, vec![1]);

        // (255 + 255) / 2 must not overflow before the halving
        let mut row = vec![255, 0];
        ScanlineFilter::reconstruct(FilterType::Average, &mut row, &[0, 255], 1);
        assert_eq!(row, vec![255, 255]);
    }

    #[test]
    fn test_average_first_pixel_halves_above() {
        let mut row = vec![1, 1, 1, 1];
        ScanlineFilter::reconstruct(FilterType::Average, &mut row, &[9, 9, 9, 9], 2);
        // first pixel: 1 + 9/2; then 1 + (5 + 9)/2
        assert_eq!(row, vec![5, 5, 8, 8]);
    }

    #[test]
    fn test_first_row_equals_zero_prior() {
        let raw = pattern(32, 7);
        let zeros = vec![0u8; 32];
        for filter in [FilterType::Up, FilterType::Average, FilterType::Paeth] {
            let mut with_zero_prior = raw.clone();
            ScanlineFilter::reconstruct(filter, &mut with_zero_prior, &zeros, 4);

            // Up on a zero row is None, Paeth degenerates to Sub, Average to Sub of halves.
            let mut expected = raw.clone();
            match filter {
                FilterType::Up => {}
                FilterType::Paeth => {
                    ScanlineFilter::reconstruct(FilterType::Sub, &mut expected, &zeros, 4)
                }
                _ => {
                    for i in 4..expected.len() {
                        expected[i] = expected[i].wrapping_add(expected[i - 4] / 2);
                    }
                }
            }
            assert_eq!(with_zero_prior, expected, "{:?}", filter);
        }
    }

    #[test]
    fn test_paeth_tie_order() {
        // a == b == c
        assert_eq!(ScanlineFilter::paeth_predictor(7, 7, 7), 7);
        // pa == pc < pb: a wins over c
        assert_eq!(ScanlineFilter::paeth_predictor(0, 15, 10), 0);
        // pb == pc < pa: b wins over c
        assert_eq!(ScanlineFilter::paeth_predictor(15, 0, 10), 0);
        // pa == pb: a wins over b
        assert_eq!(ScanlineFilter::paeth_predictor(10, 10, 0), 10);
        assert_eq!(ScanlineFilter::paeth_predictor(100, 200, 50), 200);
    }

    #[test]
    fn test_apply_then_reconstruct_round_trip() {
        for bpp in [1, 2, 3, 4, 6, 8] {
            let len = bpp * 5;
            let rows: Vec<Vec<u8>> = (0..4).map(|y| pattern(len, (bpp * 10 + y) as u32)).collect();
            for filter in FilterType::ALL {
                let mut prior_original = vec![0u8; len];
                let mut prior_recon = vec![0u8; len];
                for row in &rows {
                    let mut filtered = vec![0u8; len];
                    ScanlineFilter::apply(filter, row, &prior_original, bpp, &mut filtered);
                    ScanlineFilter::reconstruct(filter, &mut filtered, &prior_recon, bpp);
                    assert_eq!(&filtered, row, "{:?} bpp={}", filter, bpp);
                    prior_original.clone_from(row);
                    prior_recon = filtered;
                }
            }
        }
    }

    #[test]
    fn test_row_shorter_than_bpp() {
        let mut row = vec![3];
        ScanlineFilter::reconstruct(FilterType::Paeth, &mut row, &[4], 4);
        assert_eq!(row, vec![7]);
        let mut row = vec![3];
        ScanlineFilter::reconstruct(FilterType::Average, &mut row, &[4], 4);
        assert_eq!(row, vec![5]);
    }

    #[test]
    #[should_panic(expected = "prior row length mismatch")]
    fn test_reconstruct_rejects_short_prior() {
        let mut row = [1u8, 2, 3, 4];
        ScanlineFilter::reconstruct(FilterType::Sub, &mut row, &[0u8; 2], 1);
    }

    #[test]
    #[should_panic(expected = "output row length mismatch")]
    fn test_apply_rejects_short_output() {
        let mut out = [0u8; 3];
        ScanlineFilter::apply(FilterType::Up, &[1u8, 2, 3, 4], &[0u8; 4], 1, &mut out);
    }
}
