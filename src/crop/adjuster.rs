//! Coordinate-system adjustment after a crop
//!
//! Cropping moves the pixel origin, so the reference pixel recorded in
//! the header must move with it. This step is best effort: an image
//! with no reference pixel has no coordinate system to adjust, and a
//! malformed one must not block extraction of otherwise-valid data.

use log::{debug, warn};

use crate::crop::region::Region;
use crate::fits::header::Header;
use crate::wcs::{has_reference_pixel, Wcs};

/// Rewrites coordinate-system keywords for a new pixel origin
pub struct CoordinateSystemAdjuster;

impl CoordinateSystemAdjuster {
    /// Shift the coordinate system by the crop offset
    ///
    /// Builds the transform from the ORIGINAL header, subtracts the
    /// crop offset from its reference pixel and overwrites the defining
    /// keywords in the new header.
    ///
    /// # Arguments
    /// * `original` - The source header, untouched by axis rewrites
    /// * `new_header` - The output header to receive the shifted keys
    /// * `region` - The validated crop region
    ///
    /// # Returns
    /// true when the adjustment was applied; false when it was skipped
    /// (no reference pixel, or a malformed coordinate system)
    pub fn adjust(original: &Header, new_header: &mut Header, region: &Region) -> bool {
        if !has_reference_pixel(original) {
            debug!("No reference pixel pair; coordinate adjustment skipped");
            return false;
        }

        let mut wcs = match Wcs::from_header(original) {
            Ok(wcs) => wcs,
            Err(e) => {
                warn!("Could not update coordinate system: {}", e);
                return false;
            }
        };

        wcs.shift_reference_pixel(region.x as f64, region.y as f64);

        for card in wcs.to_header_cards() {
            match card.value {
                Some(value) => new_header.set(&card.keyword, value),
                None => {}
            }
        }

        debug!(
            "Reference pixel shifted by ({}, {})",
            region.x, region.y
        );
        true
    }
}
