//! Custom error types for FITS processing

use std::fmt;
use std::io;

/// FITS-specific error types
#[derive(Debug)]
pub enum FitsError {
    /// I/O error
    IoError(io::Error),
    /// Malformed header structure (bad card, missing END, truncated block)
    InvalidHeader(String),
    /// Keyword contains characters outside the FITS character set
    InvalidKeyword(String),
    /// A mandatory keyword is absent
    MissingKeyword(&'static str),
    /// BITPIX value not defined by the standard
    UnsupportedBitpix(i64),
    /// No HDU in the file carries 2-D (or higher) image data
    NoImageData,
    /// Requested crop region exceeds the image extent
    RegionOutOfBounds(String),
    /// Coordinate-system keywords are present but unusable
    InvalidWcs(String),
    /// Destination directory cannot be created or written
    DestinationUnwritable(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for FitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitsError::IoError(e) => write!(f, "I/O error: {}", e),
            FitsError::InvalidHeader(msg) => write!(f, "Invalid FITS header: {}", msg),
            FitsError::InvalidKeyword(kw) => write!(f, "Invalid FITS keyword: {:?}", kw),
            FitsError::MissingKeyword(kw) => write!(f, "Missing mandatory keyword: {}", kw),
            FitsError::UnsupportedBitpix(v) => write!(f, "Unsupported BITPIX value: {}", v),
            FitsError::NoImageData => write!(f, "No image data found in any HDU"),
            FitsError::RegionOutOfBounds(msg) => write!(f, "Region out of bounds: {}", msg),
            FitsError::InvalidWcs(msg) => write!(f, "Invalid coordinate system: {}", msg),
            FitsError::DestinationUnwritable(msg) => write!(f, "Destination unwritable: {}", msg),
            FitsError::GenericError(msg) => write!(f, "FITS error: {}", msg),
        }
    }
}

impl std::error::Error for FitsError {}

impl From<io::Error> for FitsError {
    fn from(error: io::Error) -> Self {
        FitsError::IoError(error)
    }
}

/// Result type for FITS operations
pub type FitsResult<T> = Result<T, FitsError>;

impl From<String> for FitsError {
    fn from(msg: String) -> Self {
        FitsError::GenericError(msg)
    }
}
