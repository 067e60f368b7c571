//! Forward filtering: turns packed pixel rows into a filtered scanline stream.

use crate::BitmapRegion;
use crate::error::ScanlineError;
use crate::filter_type::FilterType;
use crate::pixel::{PixelFormat, PixelRecord};
use crate::scanline_filter::ScanlineFilter;

/// How the encoder picks a filter for each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterStrategy {
    /// Same filter on every row.
    Fixed(FilterType),
    /// One entry per row, in order.
    PerRow(Vec<FilterType>),
    /// Per row, the filter whose output has the smallest sum of absolute
    /// values when read as signed bytes. Ties go to the lower selector.
    Adaptive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOptions {
    pub strategy: FilterStrategy,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            strategy: FilterStrategy::Adaptive,
        }
    }
}

pub struct FrameEncoder {
    options: EncoderOptions,
}

impl FrameEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes `pixels` (wire order, `width * height * bpp` bytes) into
    /// `height` rows of selector byte plus filtered bytes.
    pub fn encode(
        &self,
        pixels: &[u8],
        region: BitmapRegion,
        format: PixelFormat,
    ) -> Result<Vec<u8>, ScanlineError> {
        let bpp = format.bytes_per_pixel();
        let row_bytes = (region.width() as usize)
            .checked_mul(bpp)
            .ok_or(ScanlineError::InvalidArgumentSize)?;
        let height = region.height() as usize;
        let total = row_bytes
            .checked_mul(height)
            .ok_or(ScanlineError::InvalidArgumentSize)?;
        if pixels.len() < total {
            return Err(ScanlineError::TruncatedInput);
        }
        if row_bytes == 0 || height == 0 {
            return Ok(Vec::new());
        }
        if let FilterStrategy::PerRow(filters) = &self.options.strategy {
            if filters.len() < height {
                return Err(ScanlineError::InvalidArgumentEncodingOptions);
            }
        }

        log::debug!(
            "encoding {}x{} {} region",
            region.width(),
            region.height(),
            format.name()
        );

        let mut out: Vec<u8> = Vec::with_capacity(total + height);
        let zeros = vec![0u8; row_bytes];
        let mut filtered = vec![0u8; row_bytes];
        let mut prior: &[u8] = &zeros;

        for (y, row) in pixels[..total].chunks_exact(row_bytes).enumerate() {
            let filter = match &self.options.strategy {
                FilterStrategy::Fixed(filter) => *filter,
                FilterStrategy::PerRow(filters) => filters[y],
                FilterStrategy::Adaptive => Self::choose_filter(row, prior, bpp, &mut filtered),
            };
            ScanlineFilter::apply(filter, row, prior, bpp, &mut filtered);
            log::trace!("row {}: filter {}", y, filter.name());

            out.push(filter.into());
            out.extend_from_slice(&filtered);
            prior = row;
        }
        Ok(out)
    }

    /// Encodes a typed pixel buffer.
    pub fn encode_records<P: PixelRecord>(
        &self,
        pixels: &[P],
        region: BitmapRegion,
    ) -> Result<Vec<u8>, ScanlineError> {
        let count = region
            .pixel_count()
            .ok_or(ScanlineError::InvalidArgumentSize)?;
        if pixels.len() < count {
            return Err(ScanlineError::TruncatedInput);
        }
        let mut wire = Vec::with_capacity(count * P::FORMAT.bytes_per_pixel());
        for p in &pixels[..count] {
            p.write_wire(&mut wire);
        }
        self.encode(&wire, region, P::FORMAT)
    }

    fn choose_filter(row: &[u8], prior: &[u8], bpp: usize, scratch: &mut [u8]) -> FilterType {
        let mut best = FilterType::None;
        let mut best_cost = u64::MAX;
        for filter in FilterType::ALL {
            ScanlineFilter::apply(filter, row, prior, bpp, scratch);
            let cost: u64 = scratch
                .iter()
                .map(|&b| (b as i8).unsigned_abs() as u64)
                .sum();
            if cost < best_cost {
                best = filter;
                best_cost = cost;
            }
        }
        best
    }
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(EncoderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_sub_matches_hand_encoding() -> Result<(), ScanlineError> {
        let encoder = FrameEncoder::new(EncoderOptions {
            strategy: FilterStrategy::Fixed(FilterType::Sub),
        });
        let pixels = [10, 20, 30, 15, 25, 35];
        let encoded = encoder.encode(&pixels, BitmapRegion::new(2, 1), PixelFormat::Rgb8)?;
        assert_eq!(encoded, vec![1, 10, 20, 30, 5, 5, 5]);
        Ok(())
    }

    #[test]
    fn test_per_row_needs_an_entry_per_row() {
        let encoder = FrameEncoder::new(EncoderOptions {
            strategy: FilterStrategy::PerRow(vec![FilterType::Up]),
        });
        let result = encoder.encode(&[0u8; 4], BitmapRegion::new(2, 2), PixelFormat::Grey8);
        assert_eq!(result, Err(ScanlineError::InvalidArgumentEncodingOptions));
    }

    #[test]
    fn test_adaptive_prefers_up_for_repeated_rows() -> Result<(), ScanlineError> {
        let row = [17u8, 201, 3, 90, 250, 11];
        let mut pixels = row.to_vec();
        pixels.extend_from_slice(&row);
        let encoded =
            FrameEncoder::default().encode(&pixels, BitmapRegion::new(6, 2), PixelFormat::Grey8)?;
        assert_eq!(encoded[7], u8::from(FilterType::Up));
        assert!(encoded[8..].iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn test_short_pixel_buffer() {
        let result =
            FrameEncoder::default().encode(&[0u8; 5], BitmapRegion::new(2, 1), PixelFormat::Rgb8);
        assert_eq!(result, Err(ScanlineError::TruncatedInput));
    }
}
