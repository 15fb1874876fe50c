//! Region structure for defining the crop area
//!
//! A Region specifies a rectangular area of an image in pixel
//! coordinates, with (0,0) at the top-left corner and exclusive end
//! bounds.

use crate::fits::errors::{FitsError, FitsResult};

/// Region for image cropping (in pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// X-coordinate of the top-left corner (pixels from left)
    pub x: u32,

    /// Y-coordinate of the top-left corner (pixels from top)
    pub y: u32,

    /// Width of the region in pixels
    pub width: u32,

    /// Height of the region in pixels
    pub height: u32,
}

impl Region {
    /// Create a new region
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the rightmost X coordinate (exclusive)
    ///
    /// Widened so that corner coordinates near `u32::MAX` never wrap.
    pub fn end_x(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Get the bottommost Y coordinate (exclusive)
    pub fn end_y(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Parse a region from CLI text
    ///
    /// Accepts `x,y,w,h` and `x,y,WxH` forms, e.g. `10,10,50,50` or
    /// `10,10,50x50`.
    ///
    /// # Arguments
    /// * `text` - The region specification string
    ///
    /// # Returns
    /// The parsed region or an error naming the malformed part
    pub fn parse(text: &str) -> FitsResult<Self> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();

        let (x, y, w, h) = match parts.as_slice() {
            [x, y, w, h] => (*x, *y, *w, *h),
            [x, y, size] => match size.split_once(['x', 'X']) {
                Some((w, h)) => (*x, *y, w.trim(), h.trim()),
                None => {
                    return Err(FitsError::GenericError(format!(
                        "Invalid region size '{}', expected WxH",
                        size
                    )))
                }
            },
            _ => {
                return Err(FitsError::GenericError(format!(
                    "Invalid region '{}', expected x,y,w,h or x,y,WxH",
                    text
                )))
            }
        };

        let parse_field = |name: &str, field: &str| -> FitsResult<u32> {
            field.parse::<u32>().map_err(|_| {
                FitsError::GenericError(format!("Invalid region {} '{}'", name, field))
            })
        };

        Ok(Region::new(
            parse_field("x", x)?,
            parse_field("y", y)?,
            parse_field("width", w)?,
            parse_field("height", h)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_form() {
        assert_eq!(Region::parse("10,20,50,60").unwrap(), Region::new(10, 20, 50, 60));
    }

    #[test]
    fn parses_size_form() {
        assert_eq!(Region::parse("10, 20, 50x60").unwrap(), Region::new(10, 20, 50, 60));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(Region::parse("10,20").is_err());
        assert!(Region::parse("10,20,abc,60").is_err());
        assert!(Region::parse("10,20,50by60").is_err());
    }
}
