//! Pixel formats and typed pixel records.
//!
//! A [`PixelFormat`] is a closed runtime tag over the eight supported layouts.
//! Each layout also has a concrete record type (`Rgb<u8>`, `GreyAlpha<u16>`, ...)
//! implementing [`PixelRecord`], so a caller holding a typed buffer can decode
//! straight into it while the filter stage stays format agnostic.

use crate::byte_order::from_host16;
use crate::byte_source::ByteSource;
use crate::error::ScanlineError;
use std::fmt::Debug;

/// One channel value as stored on the wire.
pub trait Sample: Copy + Clone + Debug + Default + PartialEq + Eq {
    /// Width of the sample in bytes.
    const WIDTH: usize;

    fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError>;
    fn write_wire(self, out: &mut Vec<u8>);
    fn write_host(self, out: &mut Vec<u8>);
}

impl Sample for u8 {
    const WIDTH: usize = 1;

    fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
        source.read_u8()
    }

    fn write_wire(self, out: &mut Vec<u8>) {
        out.push(self);
    }

    fn write_host(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl Sample for u16 {
    const WIDTH: usize = 2;

    fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
        source.read_u16()
    }

    fn write_wire(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&from_host16(self));
    }

    fn write_host(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_ne_bytes());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grey<T> {
    pub v: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreyAlpha<T> {
    pub v: T,
    pub a: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb<T> {
    pub r: T,
    pub g: T,
    pub b: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba<T> {
    pub r: T,
    pub g: T,
    pub b: T,
    pub a: T,
}

impl<T: Sample> Grey<T> {
    fn read_samples<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
        Ok(Self { v: T::read(source)? })
    }

    fn write_samples(&self, out: &mut Vec<u8>, host: bool) {
        put(self.v, out, host);
    }
}

impl<T: Sample> GreyAlpha<T> {
    fn read_samples<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
        let Grey { v } = Grey::<T>::read_samples(source)?;
        Ok(Self {
            v,
            a: T::read(source)?,
        })
    }

    fn write_samples(&self, out: &mut Vec<u8>, host: bool) {
        put(self.v, out, host);
        put(self.a, out, host);
    }
}

impl<T: Sample> Rgb<T> {
    fn read_samples<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
        let r = T::read(source)?;
        let g = T::read(source)?;
        let b = T::read(source)?;
        Ok(Self { r, g, b })
    }

    fn write_samples(&self, out: &mut Vec<u8>, host: bool) {
        put(self.r, out, host);
        put(self.g, out, host);
        put(self.b, out, host);
    }
}

impl<T: Sample> Rgba<T> {
    fn read_samples<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
        let Rgb { r, g, b } = Rgb::<T>::read_samples(source)?;
        Ok(Self {
            r,
            g,
            b,
            a: T::read(source)?,
        })
    }

    fn write_samples(&self, out: &mut Vec<u8>, host: bool) {
        put(self.r, out, host);
        put(self.g, out, host);
        put(self.b, out, host);
        put(self.a, out, host);
    }
}

fn put<T: Sample>(sample: T, out: &mut Vec<u8>, host: bool) {
    if host {
        sample.write_host(out);
    } else {
        sample.write_wire(out);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Grey8,
    Grey16,
    GreyAlpha8,
    GreyAlpha16,
    Rgb8,
    Rgb16,
    Rgba8,
    Rgba16,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 8] = [
        PixelFormat::Grey8,
        PixelFormat::Grey16,
        PixelFormat::GreyAlpha8,
        PixelFormat::GreyAlpha16,
        PixelFormat::Rgb8,
        PixelFormat::Rgb16,
        PixelFormat::Rgba8,
        PixelFormat::Rgba16,
    ];

    /// Bytes per sample: 1 or 2.
    pub const fn sample_width(self) -> usize {
        match self {
            PixelFormat::Grey8
            | PixelFormat::GreyAlpha8
            | PixelFormat::Rgb8
            | PixelFormat::Rgba8 => 1,
            PixelFormat::Grey16
            | PixelFormat::GreyAlpha16
            | PixelFormat::Rgb16
            | PixelFormat::Rgba16 => 2,
        }
    }

    pub const fn sample_count(self) -> usize {
        match self {
            PixelFormat::Grey8 | PixelFormat::Grey16 => 1,
            PixelFormat::GreyAlpha8 | PixelFormat::GreyAlpha16 => 2,
            PixelFormat::Rgb8 | PixelFormat::Rgb16 => 3,
            PixelFormat::Rgba8 | PixelFormat::Rgba16 => 4,
        }
    }

    /// Byte stride between consecutive pixels; also the "left" offset used by filtering.
    pub const fn bytes_per_pixel(self) -> usize {
        self.sample_width() * self.sample_count()
    }

    pub const fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::GreyAlpha8
                | PixelFormat::GreyAlpha16
                | PixelFormat::Rgba8
                | PixelFormat::Rgba16
        )
    }

    /// Maps a PNG `IHDR` color type and bit depth to a format.
    ///
    /// Palette images and sub-byte depths have no direct layout here.
    pub fn from_color_type(color_type: u8, bit_depth: u8) -> Option<Self> {
        match (color_type, bit_depth) {
            (0, 8) => Some(PixelFormat::Grey8),
            (0, 16) => Some(PixelFormat::Grey16),
            (2, 8) => Some(PixelFormat::Rgb8),
            (2, 16) => Some(PixelFormat::Rgb16),
            (4, 8) => Some(PixelFormat::GreyAlpha8),
            (4, 16) => Some(PixelFormat::GreyAlpha16),
            (6, 8) => Some(PixelFormat::Rgba8),
            (6, 16) => Some(PixelFormat::Rgba16),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Grey8 => "grey8",
            PixelFormat::Grey16 => "grey16",
            PixelFormat::GreyAlpha8 => "grey-alpha8",
            PixelFormat::GreyAlpha16 => "grey-alpha16",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Rgb16 => "rgb16",
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Rgba16 => "rgba16",
        }
    }

    /// Reads `bytes_per_pixel()` bytes and decodes them into a tagged pixel.
    pub fn decode_pixel<S: ByteSource + ?Sized>(
        self,
        source: &mut S,
    ) -> Result<Pixel, ScanlineError> {
        Ok(match self {
            PixelFormat::Grey8 => Pixel::Grey8(Grey::read_samples(source)?),
            PixelFormat::Grey16 => Pixel::Grey16(Grey::read_samples(source)?),
            PixelFormat::GreyAlpha8 => Pixel::GreyAlpha8(GreyAlpha::read_samples(source)?),
            PixelFormat::GreyAlpha16 => Pixel::GreyAlpha16(GreyAlpha::read_samples(source)?),
            PixelFormat::Rgb8 => Pixel::Rgb8(Rgb::read_samples(source)?),
            PixelFormat::Rgb16 => Pixel::Rgb16(Rgb::read_samples(source)?),
            PixelFormat::Rgba8 => Pixel::Rgba8(Rgba::read_samples(source)?),
            PixelFormat::Rgba16 => Pixel::Rgba16(Rgba::read_samples(source)?),
        })
    }
}

/// A decoded pixel tagged with its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Grey8(Grey<u8>),
    Grey16(Grey<u16>),
    GreyAlpha8(GreyAlpha<u8>),
    GreyAlpha16(GreyAlpha<u16>),
    Rgb8(Rgb<u8>),
    Rgb16(Rgb<u16>),
    Rgba8(Rgba<u8>),
    Rgba16(Rgba<u16>),
}

impl Default for Pixel {
    fn default() -> Self {
        Pixel::Grey8(Grey::default())
    }
}

impl Pixel {
    pub fn format(&self) -> PixelFormat {
        match self {
            Pixel::Grey8(_) => PixelFormat::Grey8,
            Pixel::Grey16(_) => PixelFormat::Grey16,
            Pixel::GreyAlpha8(_) => PixelFormat::GreyAlpha8,
            Pixel::GreyAlpha16(_) => PixelFormat::GreyAlpha16,
            Pixel::Rgb8(_) => PixelFormat::Rgb8,
            Pixel::Rgb16(_) => PixelFormat::Rgb16,
            Pixel::Rgba8(_) => PixelFormat::Rgba8,
            Pixel::Rgba16(_) => PixelFormat::Rgba16,
        }
    }

    /// Appends the samples in wire order (16-bit samples big-endian).
    pub fn write_wire(&self, out: &mut Vec<u8>) {
        self.write(out, false);
    }

    /// Appends the samples with 16-bit values in host byte order.
    pub fn write_host(&self, out: &mut Vec<u8>) {
        self.write(out, true);
    }

    fn write(&self, out: &mut Vec<u8>, host: bool) {
        match self {
            Pixel::Grey8(p) => p.write_samples(out, host),
            Pixel::Grey16(p) => p.write_samples(out, host),
            Pixel::GreyAlpha8(p) => p.write_samples(out, host),
            Pixel::GreyAlpha16(p) => p.write_samples(out, host),
            Pixel::Rgb8(p) => p.write_samples(out, host),
            Pixel::Rgb16(p) => p.write_samples(out, host),
            Pixel::Rgba8(p) => p.write_samples(out, host),
            Pixel::Rgba16(p) => p.write_samples(out, host),
        }
    }
}

/// A concrete record type for one [`PixelFormat`].
pub trait PixelRecord: Copy + Default + Debug {
    const FORMAT: PixelFormat;

    fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError>;
    fn write_wire(&self, out: &mut Vec<u8>);
}

macro_rules! pixel_record {
    ($record:ident, $sample:ty, $format:ident) => {
        impl PixelRecord for $record<$sample> {
            const FORMAT: PixelFormat = PixelFormat::$format;

            fn read<S: ByteSource + ?Sized>(source: &mut S) -> Result<Self, ScanlineError> {
                Self::read_samples(source)
            }

            fn write_wire(&self, out: &mut Vec<u8>) {
                self.write_samples(out, false);
            }
        }

        impl From<$record<$sample>> for Pixel {
            fn from(p: $record<$sample>) -> Self {
                Pixel::$format(p)
            }
        }
    };
}

pixel_record!(Grey, u8, Grey8);
pixel_record!(Grey, u16, Grey16);
pixel_record!(GreyAlpha, u8, GreyAlpha8);
pixel_record!(GreyAlpha, u16, GreyAlpha16);
pixel_record!(Rgb, u8, Rgb8);
pixel_record!(Rgb, u16, Rgb16);
pixel_record!(Rgba, u8, Rgba8);
pixel_record!(Rgba, u16, Rgba16);
