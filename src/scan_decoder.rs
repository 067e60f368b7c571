use crate::BitmapRegion;
use crate::byte_order::to_host16;
use crate::byte_source::{ByteSource, SliceSource};
use crate::error::ScanlineError;
use crate::filter_type::FilterType;
use crate::pixel::{Pixel, PixelFormat, PixelRecord};
use crate::scanline_filter::ScanlineFilter;

/// Row-sequential decoder for one region of filtered scanlines.
///
/// Each row on the wire is one filter selector byte followed by
/// `width * bytes_per_pixel` filtered bytes. Rows must be handled strictly in
/// order: Up, Average and Paeth predict from the previous row's reconstructed
/// bytes, which is why the decoder keeps a one-row lookback buffer.
pub struct FrameDecoder<S> {
    source: S,
    region: BitmapRegion,
    format: PixelFormat,
    row_bytes: usize,
    pixel_count: usize,
    prior: Vec<u8>,
    current: Vec<u8>,
    line: u32,
    filter_counts: [u32; 5],
}

impl<S: ByteSource> FrameDecoder<S> {
    pub fn new(
        source: S,
        region: BitmapRegion,
        format: PixelFormat,
    ) -> Result<Self, ScanlineError> {
        let row_bytes = (region.width() as usize)
            .checked_mul(format.bytes_per_pixel())
            .ok_or(ScanlineError::InvalidArgumentSize)?;
        let pixel_count = region.pixel_count().ok_or(ScanlineError::InvalidArgumentSize)?;

        Ok(Self {
            source,
            region,
            format,
            row_bytes,
            pixel_count,
            prior: vec![0u8; row_bytes],
            current: vec![0u8; row_bytes],
            line: 0,
            filter_counts: [0; 5],
        })
    }

    pub fn region(&self) -> BitmapRegion {
        self.region
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes in one reconstructed row, excluding the filter selector.
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Number of rows reconstructed so far.
    pub fn rows_decoded(&self) -> u32 {
        self.line
    }

    /// How many rows used each filter, indexed by selector value.
    pub fn filter_counts(&self) -> [u32; 5] {
        self.filter_counts
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    /// Reads and reconstructs the next row.
    ///
    /// Returns `None` once every row of the region has been produced.
    pub fn next_row(&mut self) -> Result<Option<&[u8]>, ScanlineError> {
        if self.is_empty() || self.line >= self.region.height() {
            return Ok(None);
        }

        let filter = FilterType::try_from(self.source.read_u8()?)?;
        self.source.read(&mut self.current)?;
        ScanlineFilter::reconstruct(
            filter,
            &mut self.current,
            &self.prior,
            self.format.bytes_per_pixel(),
        );
        log::trace!("row {}: filter {}", self.line, filter.name());

        self.filter_counts[u8::from(filter) as usize] += 1;
        self.line += 1;

        // The reconstructed row becomes the lookback for the next one.
        std::mem::swap(&mut self.prior, &mut self.current);
        Ok(Some(&self.prior))
    }

    fn decode_rows<F>(&mut self, mut store: F) -> Result<(), ScanlineError>
    where
        F: FnMut(usize, &mut SliceSource<'_>) -> Result<(), ScanlineError>,
    {
        log::debug!(
            "decoding {}x{} {} region",
            self.region.width(),
            self.region.height(),
            self.format.name()
        );

        let width = self.region.width() as usize;
        let bpp = self.format.bytes_per_pixel();
        loop {
            let y = self.line as usize;
            let row = match self.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => {
                    log::warn!("scanline decode aborted at row {}: {}", y, e);
                    return Err(e);
                }
            };
            for (x, window) in row.chunks_exact(bpp).enumerate() {
                store(x + y * width, &mut SliceSource::new(window))?;
            }
        }

        log::debug!("decoded {} rows", self.line);
        Ok(())
    }

    fn check_destination(&self, len: usize) -> Result<(), ScanlineError> {
        if len < self.pixel_count {
            return Err(ScanlineError::DestinationTooSmall);
        }
        Ok(())
    }

    /// Decodes every remaining row into tagged pixels at `destination[x + y * width]`.
    pub fn decode(&mut self, destination: &mut [Pixel]) -> Result<(), ScanlineError> {
        self.check_destination(destination.len())?;
        let format = self.format;
        self.decode_rows(|index, window| {
            destination[index] = format.decode_pixel(window)?;
            Ok(())
        })
    }

    /// Decodes into a typed buffer whose record type matches the region's format.
    pub fn decode_into<P: PixelRecord>(
        &mut self,
        destination: &mut [P],
    ) -> Result<(), ScanlineError> {
        if P::FORMAT != self.format {
            return Err(ScanlineError::PixelFormatMismatch);
        }
        self.check_destination(destination.len())?;
        self.decode_rows(|index, window| {
            destination[index] = P::read(window)?;
            Ok(())
        })
    }

    /// Decodes the remaining rows into packed samples, 16-bit samples in host byte order.
    pub fn decode_to_bytes(&mut self) -> Result<Vec<u8>, ScanlineError> {
        self.row_bytes
            .checked_mul(self.region.height() as usize)
            .ok_or(ScanlineError::InvalidArgumentSize)?;
        // Grow row by row; the region size alone says nothing about how much the source holds.
        let mut out = Vec::with_capacity(self.row_bytes);
        let wide = self.format.sample_width() == 2;

        while let Some(row) = self.next_row()? {
            if wide {
                for pair in row.chunks_exact(2) {
                    out.extend_from_slice(&to_host16([pair[0], pair[1]]).to_ne_bytes());
                }
            } else {
                out.extend_from_slice(row);
            }
        }
        Ok(out)
    }
}

/// Decodes one region from `source` into `destination`.
///
/// On failure the rows written before the failing one are left in place.
pub fn decode<S: ByteSource>(
    source: S,
    destination: &mut [Pixel],
    region: BitmapRegion,
    format: PixelFormat,
) -> Result<(), ScanlineError> {
    FrameDecoder::new(source, region, format)?.decode(destination)
}

/// Typed counterpart of [`decode`]; the format comes from the record type.
pub fn decode_into<S: ByteSource, P: PixelRecord>(
    source: S,
    destination: &mut [P],
    region: BitmapRegion,
) -> Result<(), ScanlineError> {
    FrameDecoder::new(source, region, P::FORMAT)?.decode_into(destination)
}
