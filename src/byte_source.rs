//! Sequential byte sources consumed by the scanline decoder.
//!
//! A source hands out exactly the number of bytes asked for or fails; there
//! are no partial reads.

use crate::byte_order::{to_host16, to_host32};
use crate::error::ScanlineError;
use std::io::Read;

pub trait ByteSource {
    /// Fills `buf` completely or fails.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), ScanlineError>;

    fn read_u8(&mut self) -> Result<u8, ScanlineError> {
        let mut b = [0u8; 1];
        self.read(&mut b)?;
        Ok(b[0])
    }

    fn read_u16(&mut self) -> Result<u16, ScanlineError> {
        let mut b = [0u8; 2];
        self.read(&mut b)?;
        Ok(to_host16(b))
    }

    fn read_u32(&mut self) -> Result<u32, ScanlineError> {
        let mut b = [0u8; 4];
        self.read(&mut b)?;
        Ok(to_host32(b))
    }

    fn read_vec(&mut self, count: usize) -> Result<Vec<u8>, ScanlineError> {
        let mut v = vec![0u8; count];
        self.read(&mut v)?;
        Ok(v)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), ScanlineError> {
        (**self).read(buf)
    }
}

/// In-memory source over a byte slice.
pub struct SliceSource<'a> {
    source: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.source[self.position..]
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.source.len()
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), ScanlineError> {
        let end = self
            .position
            .checked_add(buf.len())
            .ok_or(ScanlineError::TruncatedInput)?;
        if end > self.source.len() {
            return Err(ScanlineError::TruncatedInput);
        }
        buf.copy_from_slice(&self.source[self.position..end]);
        self.position = end;
        Ok(())
    }
}

/// Adapts any [`Read`] (a file, a decompressor, a socket) into a [`ByteSource`].
///
/// An early end of stream becomes [`ScanlineError::TruncatedInput`], any other
/// I/O failure becomes [`ScanlineError::SourceFailure`].
pub struct ReaderSource<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), ScanlineError> {
        self.inner.read_exact(buf)?;
        self.consumed += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_slice_source_reads_sequentially() -> Result<(), ScanlineError> {
        let data = [0x01, 0x00, 0xFF, 0x12, 0x34, 0x56, 0x78];
        let mut source = SliceSource::new(&data);
        assert_eq!(source.read_u8()?, 0x01);
        assert_eq!(source.read_u16()?, 0x00FF);
        assert_eq!(source.read_u32()?, 0x1234_5678);
        assert!(source.is_empty());
        Ok(())
    }

    #[test]
    fn test_short_read_consumes_nothing() {
        let data = [1, 2, 3];
        let mut source = SliceSource::new(&data);
        let mut buf = [0u8; 4];
        assert_eq!(source.read(&mut buf), Err(ScanlineError::TruncatedInput));
        assert_eq!(source.position(), 0);
        assert_eq!(source.remaining(), &[1, 2, 3]);
    }

    #[test]
    fn test_reader_source_maps_eof() {
        let data: &[u8] = &[9, 8];
        let mut source = ReaderSource::new(data);
        assert_eq!(source.read_u8(), Ok(9));
        assert_eq!(source.read_u16(), Err(ScanlineError::TruncatedInput));
    }

    struct FailingReader;

    impl io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream"))
        }
    }

    #[test]
    fn test_reader_source_maps_fault() {
        let mut source = ReaderSource::new(FailingReader);
        assert_eq!(source.read_u8(), Err(ScanlineError::SourceFailure));
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn test_mut_ref_is_a_source() -> Result<(), ScanlineError> {
        fn first<S: ByteSource>(mut s: S) -> Result<u8, ScanlineError> {
            s.read_u8()
        }
        let data = [7, 6];
        let mut source = SliceSource::new(&data);
        assert_eq!(first(&mut source)?, 7);
        assert_eq!(source.read_u8()?, 6);
        Ok(())
    }
}
