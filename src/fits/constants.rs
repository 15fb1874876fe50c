//! Constants for the FITS file format
//!
//! Block and card geometry from the FITS standard, plus the keyword
//! vocabulary this tool reads and rewrites.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Size of one FITS block in bytes
pub const BLOCK_SIZE: usize = 2880;

/// Size of one header card in bytes
pub const CARD_SIZE: usize = 80;

/// Number of cards in one header block
pub const CARDS_PER_BLOCK: usize = 36;

/// Length of the keyword field at the start of a card
pub const KEYWORD_SIZE: usize = 8;

/// Standard keyword names
pub mod keywords {
    pub const SIMPLE: &str = "SIMPLE";
    pub const BITPIX: &str = "BITPIX";
    pub const NAXIS: &str = "NAXIS";
    pub const NAXIS1: &str = "NAXIS1";
    pub const NAXIS2: &str = "NAXIS2";
    pub const XTENSION: &str = "XTENSION";
    pub const PCOUNT: &str = "PCOUNT";
    pub const GCOUNT: &str = "GCOUNT";
    pub const EXTEND: &str = "EXTEND";
    pub const END: &str = "END";
    pub const HISTORY: &str = "HISTORY";
    pub const COMMENT: &str = "COMMENT";

    pub const CRPIX1: &str = "CRPIX1";
    pub const CRPIX2: &str = "CRPIX2";
    pub const CRVAL1: &str = "CRVAL1";
    pub const CRVAL2: &str = "CRVAL2";
    pub const CDELT1: &str = "CDELT1";
    pub const CDELT2: &str = "CDELT2";
    pub const CROTA2: &str = "CROTA2";
    pub const CD1_1: &str = "CD1_1";
    pub const CD1_2: &str = "CD1_2";
    pub const CD2_1: &str = "CD2_1";
    pub const CD2_2: &str = "CD2_2";
    pub const CTYPE1: &str = "CTYPE1";
    pub const CTYPE2: &str = "CTYPE2";
    pub const CUNIT1: &str = "CUNIT1";
    pub const CUNIT2: &str = "CUNIT2";

    pub const EXPTIME: &str = "EXPTIME";
    pub const DATE_OBS: &str = "DATE-OBS";
    pub const FILTER: &str = "FILTER";
    pub const TELESCOP: &str = "TELESCOP";
    pub const INSTRUME: &str = "INSTRUME";
}

/// Observation metadata preserved verbatim across a crop.
///
/// Keys absent from the source header are simply omitted from the
/// output, never defaulted.
pub const CURATED_KEYWORDS: [&str; 5] = [
    keywords::EXPTIME,
    keywords::DATE_OBS,
    keywords::FILTER,
    keywords::TELESCOP,
    keywords::INSTRUME,
];

lazy_static! {
    /// Keywords that define a world coordinate system.
    ///
    /// Used to decide whether a header carries WCS information at all;
    /// the adjuster itself works from the parsed [`crate::wcs::Wcs`].
    pub static ref WCS_KEYWORDS: HashSet<&'static str> = [
        keywords::CRPIX1, keywords::CRPIX2,
        keywords::CRVAL1, keywords::CRVAL2,
        keywords::CDELT1, keywords::CDELT2,
        keywords::CROTA2,
        keywords::CD1_1, keywords::CD1_2,
        keywords::CD2_1, keywords::CD2_2,
        keywords::CTYPE1, keywords::CTYPE2,
        keywords::CUNIT1, keywords::CUNIT2,
    ]
    .iter()
    .copied()
    .collect();
}

/// File extensions recognized as FITS containers (matched case-insensitively)
pub const FITS_EXTENSIONS: [&str; 3] = ["fit", "fits", "fts"];
