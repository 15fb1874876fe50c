//! Metadata curation for cropped output headers
//!
//! A fixed allow-list of observation keywords rides through the crop
//! verbatim, and one HISTORY entry records the provenance of the
//! transformation. Existing history is never removed or reordered.

use log::debug;

use crate::crop::region::Region;
use crate::fits::constants::CURATED_KEYWORDS;
use crate::fits::header::Header;

/// Copies allow-listed metadata and records crop provenance
pub struct MetadataCurator;

impl MetadataCurator {
    /// Curate the new header from the original
    ///
    /// Allow-listed keywords are copied only if present in the
    /// original; absent keys are omitted, never defaulted. One HISTORY
    /// entry describing the crop is appended after all pre-existing
    /// entries.
    ///
    /// # Arguments
    /// * `original` - The source header
    /// * `new_header` - The output header
    /// * `region` - The crop region recorded in the provenance entry
    pub fn curate(original: &Header, new_header: &mut Header, region: &Region) {
        for keyword in CURATED_KEYWORDS {
            if let Some(value) = original.get(keyword) {
                new_header.set(keyword, value.clone());
                debug!("Preserved {}", keyword);
            }
        }

        new_header.add_history(&format!(
            "Cropped to {}x{} pixels at ({}, {})",
            region.width, region.height, region.x, region.y
        ));
    }
}
