//! FITS file format parsing module
//!
//! This module provides structures and functions for reading and
//! writing FITS format files.

pub mod errors;
pub mod constants;
pub mod value;
pub mod header;
pub mod hdu;
pub mod reader;
pub mod writer;
#[cfg(test)]
mod tests;

pub use errors::{FitsError, FitsResult};
pub use value::Value;
pub use header::{Card, Header};
pub use hdu::{Bitpix, FitsFile, Hdu, PixelData};
pub use reader::FitsReader;
pub use writer::{FitsWriter, ValidationMode};
