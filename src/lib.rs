//! Scanline reconstruction for PNG-style filtered raster rows.
//!
//! The crate consumes a sequential [`ByteSource`] of already decompressed
//! image data, reverses the per-row filters (None, Sub, Up, Average, Paeth)
//! and decodes the reconstructed bytes into one of eight pixel layouts.
//! Container parsing, decompression, palettes and interlace pass ordering
//! live outside: an interlacing driver calls [`decode`] once per pass with
//! that pass's [`BitmapRegion`].

pub mod byte_order;
pub mod byte_source;
pub mod error;
pub mod filter_type;
pub mod pixel;
pub mod scan_decoder;
pub mod scan_encoder;
pub mod scanline_filter;

pub use byte_source::{ByteSource, ReaderSource, SliceSource};
pub use error::ScanlineError;
pub use filter_type::FilterType;
pub use pixel::{Grey, GreyAlpha, Pixel, PixelFormat, PixelRecord, Rgb, Rgba};
pub use scan_decoder::{FrameDecoder, decode, decode_into};
pub use scan_encoder::{EncoderOptions, FilterStrategy, FrameEncoder};
pub use scanline_filter::ScanlineFilter;

/// The addressable rectangle of one decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapRegion {
    width: u32,
    height: u32,
}

impl BitmapRegion {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `width * height`, or `None` if it does not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_a_plain_value() {
        let region = BitmapRegion::new(640, 480);
        let copy = region;
        assert_eq!(copy.width(), 640);
        assert_eq!(copy.height(), 480);
        assert_eq!(region.pixel_count(), Some(640 * 480));
        assert_eq!(BitmapRegion::new(0, 10).pixel_count(), Some(0));
    }
}
