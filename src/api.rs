use std::fmt::Write as _;
use std::path::Path;

use crate::batch::{BatchReport, BatchRunner, NamingPolicy};
use crate::crop::{CropEngine, CropOutcome, Region};
use crate::fits::constants::{CURATED_KEYWORDS, WCS_KEYWORDS};
use crate::fits::errors::FitsResult;
use crate::fits::reader::FitsReader;
use crate::utils::logger::Logger;
use crate::wcs::has_reference_pixel;

/// Main interface to the fitscrop library
pub struct FitsCrop {
    logger: Logger,
}

impl FitsCrop {
    /// Create a new FitsCrop instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "fitscrop.log"
    ///
    /// # Returns
    /// A FitsCrop instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> FitsResult<Self> {
        let log_path = log_file.unwrap_or("fitscrop.log");
        let logger = Logger::new(log_path)?;
        Ok(FitsCrop { logger })
    }

    /// Analyze a FITS file and return information about its structure
    ///
    /// # Arguments
    /// * `input_path` - Path to the FITS file to analyze
    ///
    /// # Returns
    /// String containing analysis information or an error
    pub fn analyze(&self, input_path: &Path) -> FitsResult<String> {
        let mut reader = FitsReader::new();
        let file = reader.load(input_path)?;

        let mut result = String::from("FITS Analysis Results:\n");
        let _ = writeln!(result, "  Number of HDUs: {}", file.hdu_count());

        for (i, hdu) in file.hdus.iter().enumerate() {
            let _ = writeln!(result, "\nHDU #{} ({} header cards)", i, hdu.header.len());

            match &hdu.data {
                Some(pixels) => {
                    let dims: Vec<String> =
                        pixels.shape.iter().rev().map(|d| d.to_string()).collect();
                    let _ = writeln!(result, "  Dimensions: {}", dims.join("x"));
                    let _ = writeln!(result, "  BITPIX: {}", pixels.bitpix.code());

                    if pixels.ndim() >= 2 {
                        if let Ok((min, max)) = plane_range(pixels) {
                            let _ = writeln!(result, "  Sample range: {} .. {}", min, max);
                        }
                    }
                }
                None => {
                    let _ = writeln!(result, "  No pixel data");
                }
            }

            for keyword in CURATED_KEYWORDS {
                if let Some(value) = hdu.header.get(keyword) {
                    let _ = writeln!(result, "  {}: {:?}", keyword, value);
                }
            }

            let has_wcs_keys = hdu
                .header
                .cards()
                .iter()
                .any(|c| WCS_KEYWORDS.contains(c.keyword.to_ascii_uppercase().as_str()));
            if has_wcs_keys {
                let anchored = if has_reference_pixel(&hdu.header) {
                    "with reference pixel"
                } else {
                    "without reference pixel"
                };
                let _ = writeln!(result, "  Coordinate system: present ({})", anchored);
            }
        }

        Ok(result)
    }

    /// Crop a single FITS file in memory
    ///
    /// # Arguments
    /// * `input_path` - Path to the FITS file
    /// * `region` - The crop rectangle
    ///
    /// # Returns
    /// The crop outcome; writing the result is up to the caller
    pub fn crop_file(&self, input_path: &Path, region: Region) -> CropOutcome {
        CropEngine::crop_file(input_path, &region)
    }

    /// Crop every FITS file in a directory
    ///
    /// # Arguments
    /// * `source` - Directory holding the source FITS files
    /// * `destination` - Directory for the cropped output (created if absent)
    /// * `region` - The crop rectangle applied to every file
    /// * `naming` - Output naming policy
    ///
    /// # Returns
    /// A per-file report, or an error when the destination is unusable
    pub fn crop_directory(
        &self,
        source: &Path,
        destination: &Path,
        region: Region,
        naming: NamingPolicy,
    ) -> FitsResult<BatchReport> {
        let runner = BatchRunner::new(region, naming, &self.logger);
        runner.run(source, destination)
    }
}

/// Min/max over the leading 2-D plane
fn plane_range(pixels: &crate::fits::hdu::PixelData) -> FitsResult<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for y in 0..pixels.height() {
        for x in 0..pixels.width() {
            let v = pixels.sample(x, y)?;
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
    }
    Ok((min, max))
}
