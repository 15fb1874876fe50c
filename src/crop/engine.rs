//! Crop orchestration engine
//!
//! Runs one file through the pipeline: locate the image plane,
//! validate the region, extract the pixels, adjust the coordinate
//! system, curate metadata. Each run is self-contained; nothing is
//! shared between files.

use log::debug;
use std::path::Path;

use crate::crop::adjuster::CoordinateSystemAdjuster;
use crate::crop::curator::MetadataCurator;
use crate::crop::locator::ImagePlaneLocator;
use crate::crop::region::Region;
use crate::crop::validator::RegionValidator;
use crate::fits::constants::keywords;
use crate::fits::errors::FitsError;
use crate::fits::hdu::{FitsFile, PixelData};
use crate::fits::header::Header;
use crate::fits::reader::FitsReader;
use crate::fits::value::Value;

/// The output of a successful crop: new pixels with their new header
#[derive(Debug, Clone)]
pub struct CropResult {
    /// The cropped 2-D pixel array
    pub pixels: PixelData,
    /// The rewritten header
    pub header: Header,
}

/// Terminal state of one file's crop
#[derive(Debug)]
pub enum CropOutcome {
    /// The crop succeeded and produced a result
    Done(CropResult),
    /// The file was skipped for an expected reason (no image data,
    /// region out of bounds); the batch continues
    Skipped(String),
    /// The file could not be processed (unreadable or malformed
    /// container); the batch continues
    Failed(String),
}

/// Orchestrates the crop pipeline for a single container
pub struct CropEngine;

impl CropEngine {
    /// Open a container and crop it
    ///
    /// The container is released as soon as the needed HDU has been
    /// copied out; no file handle outlives this call.
    pub fn crop_file(path: &Path, region: &Region) -> CropOutcome {
        let file = match FitsReader::new().load(path) {
            Ok(file) => file,
            Err(e) => return CropOutcome::Failed(e.to_string()),
        };

        Self::crop(&file, region)
    }

    /// Crop an already-opened container
    ///
    /// # Arguments
    /// * `file` - The opened container
    /// * `region` - The requested crop rectangle
    ///
    /// # Returns
    /// Done with the cropped pixels and header, or Skipped/Failed with
    /// a human-readable reason
    pub fn crop(file: &FitsFile, region: &Region) -> CropOutcome {
        // Locating
        let (hdu, pixels) = match ImagePlaneLocator::locate(file) {
            Ok(pair) => pair,
            Err(FitsError::NoImageData) => {
                return CropOutcome::Skipped("no valid image data found".to_string());
            }
            Err(e) => return CropOutcome::Failed(e.to_string()),
        };

        // Validating
        if let Err(e) = RegionValidator::validate(pixels.height(), pixels.width(), region) {
            return CropOutcome::Skipped(e.to_string());
        }

        // Extracting
        let cropped = Self::extract(pixels, region);

        // Adjusting: axis sizes always, coordinate system best effort
        let mut new_header = hdu.header.clone();
        Self::update_axis_keywords(&mut new_header, region);
        CoordinateSystemAdjuster::adjust(&hdu.header, &mut new_header, region);

        // Curating
        MetadataCurator::curate(&hdu.header, &mut new_header, region);

        debug!(
            "Cropped {}x{} region at ({}, {})",
            region.width, region.height, region.x, region.y
        );

        CropOutcome::Done(CropResult {
            pixels: cropped,
            header: new_header,
        })
    }

    /// Value-copy the region out of the leading 2-D plane
    ///
    /// Row-major slice `[y .. y+h) x [x .. x+w)`; samples keep their
    /// stored byte representation, so no value is rescaled or retyped.
    fn extract(pixels: &PixelData, region: &Region) -> PixelData {
        let bpp = pixels.bitpix.byte_width();
        let row_stride = pixels.width() * bpp;
        let (x, y) = (region.x as usize, region.y as usize);
        let (w, h) = (region.width as usize, region.height as usize);

        let mut data = Vec::with_capacity(w * h * bpp);
        for row in y..y + h {
            let start = row * row_stride + x * bpp;
            data.extend_from_slice(&pixels.data[start..start + w * bpp]);
        }

        PixelData {
            bitpix: pixels.bitpix,
            shape: vec![h, w],
            data,
        }
    }

    /// Rewrite the axis-size keywords for the cropped dimensions
    ///
    /// The output is always a 2-D primary image, so NAXIS drops to 2
    /// and any higher axis keywords are removed.
    fn update_axis_keywords(header: &mut Header, region: &Region) {
        let old_naxis = header.get_integer(keywords::NAXIS).unwrap_or(2);

        header.set(keywords::NAXIS, Value::Integer(2));
        header.set(keywords::NAXIS1, Value::Integer(region.width as i64));
        header.set(keywords::NAXIS2, Value::Integer(region.height as i64));

        for n in 3..=old_naxis {
            header.remove(&format!("NAXIS{}", n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::hdu::{Bitpix, Hdu};

    /// A 2-D u8 image whose sample at (x, y) is `(y * 16 + x) as u8`
    fn gradient_file(rows: usize, cols: usize) -> FitsFile {
        let mut data = Vec::with_capacity(rows * cols);
        for y in 0..rows {
            for x in 0..cols {
                data.push((y * 16 + x) as u8);
            }
        }
        let mut header = Header::new();
        header.set(keywords::SIMPLE, Value::Logical(true));
        header.set(keywords::BITPIX, Value::Integer(8));
        header.set(keywords::NAXIS, Value::Integer(2));
        header.set(keywords::NAXIS1, Value::Integer(cols as i64));
        header.set(keywords::NAXIS2, Value::Integer(rows as i64));

        FitsFile {
            hdus: vec![Hdu {
                header,
                data: Some(PixelData::new(Bitpix::U8, vec![rows, cols], data).unwrap()),
            }],
        }
    }

    #[test]
    fn crop_produces_expected_shape_and_axis_keys() {
        let file = gradient_file(12, 10);
        let outcome = CropEngine::crop(&file, &Region::new(2, 3, 5, 4));

        let result = match outcome {
            CropOutcome::Done(r) => r,
            other => panic!("expected Done, got {:?}", other),
        };
        assert_eq!(result.pixels.shape, vec![4, 5]);
        assert_eq!(result.header.get_integer(keywords::NAXIS1), Some(5));
        assert_eq!(result.header.get_integer(keywords::NAXIS2), Some(4));
    }

    #[test]
    fn crop_copies_pixel_values() {
        let file = gradient_file(12, 10);
        let outcome = CropEngine::crop(&file, &Region::new(2, 3, 5, 4));

        let result = match outcome {
            CropOutcome::Done(r) => r,
            other => panic!("expected Done, got {:?}", other),
        };
        // Sample (0, 0) of the crop is sample (2, 3) of the source
        assert_eq!(result.pixels.sample(0, 0).unwrap(), (3 * 16 + 2) as f64);
        assert_eq!(result.pixels.sample(4, 3).unwrap(), (6 * 16 + 6) as f64);
    }

    #[test]
    fn full_frame_crop_is_identity_on_pixels() {
        let file = gradient_file(8, 8);
        let source = file.hdus[0].data.clone().unwrap();
        let outcome = CropEngine::crop(&file, &Region::new(0, 0, 8, 8));

        match outcome {
            CropOutcome::Done(result) => assert_eq!(result.pixels.data, source.data),
            other => panic!("expected Done, got {:?}", other),
        }
    }

    #[test]
    fn out_of_bounds_region_is_skipped() {
        let file = gradient_file(10, 10);
        let outcome = CropEngine::crop(&file, &Region::new(6, 6, 5, 5));

        match outcome {
            CropOutcome::Skipped(reason) => assert!(reason.contains("exceeds")),
            other => panic!("expected Skipped, got {:?}", other),
        }
    }

    #[test]
    fn dataless_container_is_skipped() {
        let file = FitsFile {
            hdus: vec![Hdu {
                header: Header::new(),
                data: None,
            }],
        };
        let outcome = CropEngine::crop(&file, &Region::new(0, 0, 5, 5));

        match outcome {
            CropOutcome::Skipped(reason) => assert!(reason.contains("no valid image data")),
            other => panic!("expected Skipped, got {:?}", other),
        }
    }

    #[test]
    fn malformed_wcs_still_reaches_done() {
        let mut file = gradient_file(10, 10);
        let header = &mut file.hdus[0].header;
        header.set(keywords::CRPIX1, Value::Text("not-a-number".to_string()));
        header.set(keywords::CRPIX2, Value::Real(5.0));

        let outcome = CropEngine::crop(&file, &Region::new(1, 1, 4, 4));
        let result = match outcome {
            CropOutcome::Done(r) => r,
            other => panic!("expected Done, got {:?}", other),
        };
        // Adjustment was abandoned: coordinate keys unchanged
        assert_eq!(result.header.get_text(keywords::CRPIX1), Some("not-a-number"));
        assert_eq!(result.header.get_real(keywords::CRPIX2), Some(5.0));
        // Pixel data and provenance are still produced
        assert_eq!(result.pixels.shape, vec![4, 4]);
        assert_eq!(result.header.history().len(), 1);
    }

    #[test]
    fn cube_crops_its_leading_plane() {
        // 3 planes of 6x5; the crop targets the first plane
        let rows: usize = 6;
        let cols: usize = 5;
        let mut data = Vec::new();
        for plane in 0..3usize {
            for y in 0..rows {
                for x in 0..cols {
                    data.push((plane * 50 + y * 16 + x) as u8);
                }
            }
        }
        let mut header = Header::new();
        header.set(keywords::NAXIS, Value::Integer(3));
        header.set(keywords::NAXIS1, Value::Integer(cols as i64));
        header.set(keywords::NAXIS2, Value::Integer(rows as i64));
        header.set("NAXIS3", Value::Integer(3));
        let file = FitsFile {
            hdus: vec![Hdu {
                header,
                data: Some(PixelData::new(Bitpix::U8, vec![3, rows, cols], data).unwrap()),
            }],
        };

        let outcome = CropEngine::crop(&file, &Region::new(1, 2, 3, 2));
        let result = match outcome {
            CropOutcome::Done(r) => r,
            other => panic!("expected Done, got {:?}", other),
        };
        assert_eq!(result.pixels.shape, vec![2, 3]);
        assert_eq!(result.pixels.sample(0, 0).unwrap(), (2 * 16 + 1) as f64);
        // NAXIS collapses to 2 and the third axis keyword is gone
        assert_eq!(result.header.get_integer(keywords::NAXIS), Some(2));
        assert!(!result.header.contains("NAXIS3"));
    }
}
