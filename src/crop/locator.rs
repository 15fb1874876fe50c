//! Image plane location within a multi-extension container
//!
//! A container may open with a dataless primary HDU followed by image
//! extensions, or carry tables alongside the science image. The locator
//! is a pure, order-stable scan: the same container always yields the
//! same unit.

use log::debug;

use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::hdu::{FitsFile, Hdu, PixelData};

/// Finds the first HDU holding genuine image data
pub struct ImagePlaneLocator;

impl ImagePlaneLocator {
    /// Select the first HDU whose pixel data has dimensionality >= 2
    ///
    /// # Returns
    /// The unit together with its pixel data, or `NoImageData` when no
    /// HDU qualifies (the caller skips the file and continues the batch)
    pub fn locate(file: &FitsFile) -> FitsResult<(&Hdu, &PixelData)> {
        for (index, hdu) in file.hdus.iter().enumerate() {
            if let Some(pixels) = hdu.data.as_ref() {
                if pixels.ndim() >= 2 {
                    debug!("Selected HDU #{} as image plane", index);
                    return Ok((hdu, pixels));
                }
            }
        }
        Err(FitsError::NoImageData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::hdu::{Bitpix, PixelData};
    use crate::fits::header::Header;

    fn image_hdu(rows: usize, cols: usize) -> Hdu {
        let data = vec![0u8; rows * cols];
        Hdu {
            header: Header::new(),
            data: Some(PixelData::new(Bitpix::U8, vec![rows, cols], data).unwrap()),
        }
    }

    fn image_hdu_filled(rows: usize, cols: usize, fill: u8) -> Hdu {
        let data = vec![fill; rows * cols];
        Hdu {
            header: Header::new(),
            data: Some(PixelData::new(Bitpix::U8, vec![rows, cols], data).unwrap()),
        }
    }

    fn dataless_hdu() -> Hdu {
        Hdu {
            header: Header::new(),
            data: None,
        }
    }

    #[test]
    fn skips_dataless_primary() {
        let file = FitsFile {
            hdus: vec![dataless_hdu(), image_hdu(4, 5)],
        };
        let (hdu, pixels) = ImagePlaneLocator::locate(&file).unwrap();
        assert_eq!(hdu.dimensionality(), 2);
        assert_eq!(pixels.shape, vec![4, 5]);
    }

    #[test]
    fn skips_one_dimensional_data() {
        let spectrum = Hdu {
            header: Header::new(),
            data: Some(PixelData::new(Bitpix::U8, vec![16], vec![0u8; 16]).unwrap()),
        };
        let file = FitsFile {
            hdus: vec![spectrum, image_hdu(4, 4)],
        };
        let (hdu, _) = ImagePlaneLocator::locate(&file).unwrap();
        assert_eq!(hdu.dimensionality(), 2);
    }

    #[test]
    fn no_image_data_is_reported() {
        let file = FitsFile {
            hdus: vec![dataless_hdu()],
        };
        assert!(matches!(
            ImagePlaneLocator::locate(&file),
            Err(FitsError::NoImageData)
        ));
    }

    #[test]
    fn selection_is_deterministic() {
        let file = FitsFile {
            hdus: vec![dataless_hdu(), image_hdu(4, 5), image_hdu(8, 9)],
        };
        let (first, _) = ImagePlaneLocator::locate(&file).unwrap();
        let (second, _) = ImagePlaneLocator::locate(&file).unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.data.as_ref().unwrap().shape, vec![4, 5]);
    }

    #[test]
    fn returned_pixels_belong_to_the_selected_unit() {
        let file = FitsFile {
            hdus: vec![image_hdu_filled(2, 2, 7), image_hdu_filled(2, 2, 9)],
        };
        let (hdu, pixels) = ImagePlaneLocator::locate(&file).unwrap();
        assert!(std::ptr::eq(hdu.data.as_ref().unwrap(), pixels));
        assert_eq!(pixels.sample(0, 0).unwrap(), 7.0);
    }
}
