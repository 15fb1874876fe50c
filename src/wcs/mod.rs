//! World coordinate system handling
//!
//! Builds a pixel-to-sky transform from header keywords, shifts its
//! reference pixel when an image is cropped, and serializes the
//! defining keywords back out.

mod system;

pub use system::{has_reference_pixel, Wcs};
