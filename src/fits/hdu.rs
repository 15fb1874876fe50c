//! HDU and pixel data structures
//!
//! A FITS file is an ordered sequence of HDUs, each pairing a header
//! with optional pixel data. Pixel samples stay in their stored
//! big-endian byte form; cropping is a byte-level operation and never
//! rescales or retypes values.

use byteorder::{BigEndian, ByteOrder};

use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::header::Header;

/// Sample type of a FITS data array, from the BITPIX keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bitpix {
    /// 8-bit unsigned integer (BITPIX = 8)
    U8,
    /// 16-bit signed integer (BITPIX = 16)
    I16,
    /// 32-bit signed integer (BITPIX = 32)
    I32,
    /// 64-bit signed integer (BITPIX = 64)
    I64,
    /// 32-bit IEEE float (BITPIX = -32)
    F32,
    /// 64-bit IEEE float (BITPIX = -64)
    F64,
}

impl Bitpix {
    /// Map a BITPIX keyword value to a sample type
    pub fn from_code(code: i64) -> FitsResult<Self> {
        match code {
            8 => Ok(Bitpix::U8),
            16 => Ok(Bitpix::I16),
            32 => Ok(Bitpix::I32),
            64 => Ok(Bitpix::I64),
            -32 => Ok(Bitpix::F32),
            -64 => Ok(Bitpix::F64),
            other => Err(FitsError::UnsupportedBitpix(other)),
        }
    }

    /// The BITPIX keyword value for this sample type
    pub fn code(&self) -> i64 {
        match self {
            Bitpix::U8 => 8,
            Bitpix::I16 => 16,
            Bitpix::I32 => 32,
            Bitpix::I64 => 64,
            Bitpix::F32 => -32,
            Bitpix::F64 => -64,
        }
    }

    /// Bytes per sample
    pub fn byte_width(&self) -> usize {
        match self {
            Bitpix::U8 => 1,
            Bitpix::I16 => 2,
            Bitpix::I32 | Bitpix::F32 => 4,
            Bitpix::I64 | Bitpix::F64 => 8,
        }
    }
}

/// An N-dimensional numeric grid in stored (big-endian) byte form
///
/// `shape` is ordered slowest axis first, so a 2-D image has
/// `shape = [rows, columns]` = [NAXIS2, NAXIS1]. Higher-dimensional
/// data keeps its leading 2-D plane as the crop target.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelData {
    /// Sample type
    pub bitpix: Bitpix,
    /// Axis sizes, slowest first
    pub shape: Vec<usize>,
    /// Raw big-endian sample bytes
    pub data: Vec<u8>,
}

impl PixelData {
    /// Build pixel data, checking the byte count against the shape
    pub fn new(bitpix: Bitpix, shape: Vec<usize>, data: Vec<u8>) -> FitsResult<Self> {
        let expected: usize = shape.iter().product::<usize>() * bitpix.byte_width();
        if data.len() != expected {
            return Err(FitsError::GenericError(format!(
                "pixel buffer holds {} bytes, shape {:?} requires {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(PixelData {
            bitpix,
            shape,
            data,
        })
    }

    /// Number of axes
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Image width in pixels (fastest axis, NAXIS1)
    pub fn width(&self) -> usize {
        *self.shape.last().unwrap_or(&0)
    }

    /// Image height in pixels (second-fastest axis, NAXIS2)
    pub fn height(&self) -> usize {
        if self.shape.len() >= 2 {
            self.shape[self.shape.len() - 2]
        } else {
            0
        }
    }

    /// Decode one sample from the leading 2-D plane as f64
    ///
    /// # Arguments
    /// * `x` - Column index (0-based)
    /// * `y` - Row index (0-based)
    pub fn sample(&self, x: usize, y: usize) -> FitsResult<f64> {
        if self.ndim() < 2 || x >= self.width() || y >= self.height() {
            return Err(FitsError::GenericError(format!(
                "sample ({}, {}) outside {}x{} image",
                x,
                y,
                self.width(),
                self.height()
            )));
        }

        let bpp = self.bitpix.byte_width();
        let offset = (y * self.width() + x) * bpp;
        let bytes = &self.data[offset..offset + bpp];

        let value = match self.bitpix {
            Bitpix::U8 => bytes[0] as f64,
            Bitpix::I16 => BigEndian::read_i16(bytes) as f64,
            Bitpix::I32 => BigEndian::read_i32(bytes) as f64,
            Bitpix::I64 => BigEndian::read_i64(bytes) as f64,
            Bitpix::F32 => BigEndian::read_f32(bytes) as f64,
            Bitpix::F64 => BigEndian::read_f64(bytes),
        };

        Ok(value)
    }
}

/// One header-data unit of a FITS file
///
/// A unit without pixel data holds `None`; an empty array never stands
/// in for "no data".
#[derive(Debug, Clone)]
pub struct Hdu {
    /// The unit's header
    pub header: Header,
    /// The unit's pixel data, if any
    pub data: Option<PixelData>,
}

impl Hdu {
    /// Dimensionality of this unit's data (0 when there is none)
    pub fn dimensionality(&self) -> usize {
        self.data.as_ref().map(|d| d.ndim()).unwrap_or(0)
    }
}

/// An opened FITS container: an ordered sequence of HDUs
#[derive(Debug, Clone)]
pub struct FitsFile {
    /// HDUs in file order
    pub hdus: Vec<Hdu>,
}

impl FitsFile {
    /// Number of HDUs in the container
    pub fn hdu_count(&self) -> usize {
        self.hdus.len()
    }
}
