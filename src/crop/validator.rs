//! Region validation against image bounds
//!
//! Bounds are exclusive-end: a region whose far edge exactly touches
//! the image edge is valid. Out-of-bounds regions always fail closed;
//! nothing is ever clamped or truncated.

use crate::crop::region::Region;
use crate::fits::errors::{FitsError, FitsResult};

/// Validates a requested crop rectangle against actual image dimensions
pub struct RegionValidator;

impl RegionValidator {
    /// Check a region against an image's row/column extent
    ///
    /// Zero-size regions are rejected: a crop of no pixels is always a
    /// caller mistake, not a trivially-empty result.
    ///
    /// # Arguments
    /// * `rows` - Image height (axis 0)
    /// * `cols` - Image width (axis 1)
    /// * `region` - The requested crop rectangle
    ///
    /// # Returns
    /// Ok when the region fits, otherwise `RegionOutOfBounds` naming
    /// the offending bound
    pub fn validate(rows: usize, cols: usize, region: &Region) -> FitsResult<()> {
        if region.width == 0 || region.height == 0 {
            return Err(FitsError::RegionOutOfBounds(
                "zero-size region (width and height must be positive)".to_string(),
            ));
        }

        if region.end_x() > cols as u64 {
            return Err(FitsError::RegionOutOfBounds(format!(
                "x extent {} (= {} + {}) exceeds image width {}",
                region.end_x(),
                region.x,
                region.width,
                cols
            )));
        }

        if region.end_y() > rows as u64 {
            return Err(FitsError::RegionOutOfBounds(format!(
                "y extent {} (= {} + {}) exceeds image height {}",
                region.end_y(),
                region.y,
                region.height,
                rows
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_inside_image_is_valid() {
        assert!(RegionValidator::validate(100, 100, &Region::new(10, 10, 50, 50)).is_ok());
    }

    #[test]
    fn region_touching_edge_is_valid() {
        assert!(RegionValidator::validate(100, 100, &Region::new(50, 50, 50, 50)).is_ok());
        assert!(RegionValidator::validate(100, 100, &Region::new(0, 0, 100, 100)).is_ok());
    }

    #[test]
    fn x_overflow_is_named() {
        let err = RegionValidator::validate(100, 100, &Region::new(60, 0, 50, 40)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("x extent 110"));
        assert!(message.contains("width 100"));
    }

    #[test]
    fn y_overflow_is_named() {
        let err = RegionValidator::validate(100, 100, &Region::new(0, 60, 40, 50)).unwrap_err();
        assert!(err.to_string().contains("y extent 110"));
    }

    #[test]
    fn extreme_corner_coordinates_fail_closed() {
        let err =
            RegionValidator::validate(100, 100, &Region::new(u32::MAX, 0, 1, 1)).unwrap_err();
        assert!(matches!(err, FitsError::RegionOutOfBounds(_)));

        let err =
            RegionValidator::validate(100, 100, &Region::new(0, u32::MAX, 1, u32::MAX)).unwrap_err();
        assert!(matches!(err, FitsError::RegionOutOfBounds(_)));
    }

    #[test]
    fn zero_size_region_is_rejected() {
        assert!(RegionValidator::validate(100, 100, &Region::new(0, 0, 0, 50)).is_err());
        assert!(RegionValidator::validate(100, 100, &Region::new(0, 0, 50, 0)).is_err());
    }
}
