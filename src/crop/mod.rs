//! Crop-and-metadata-rewrite engine
//!
//! The core pipeline: locate a 2-D image plane in a container,
//! validate the requested region, extract the pixels, shift the
//! coordinate system and curate the output metadata.

mod region;
mod validator;
mod locator;
mod adjuster;
mod curator;
mod engine;

pub use region::Region;
pub use validator::RegionValidator;
pub use locator::ImagePlaneLocator;
pub use adjuster::CoordinateSystemAdjuster;
pub use curator::MetadataCurator;
pub use engine::{CropEngine, CropOutcome, CropResult};
