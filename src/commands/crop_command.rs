//! Batch crop command
//!
//! This module implements the command for cropping every FITS file in
//! a source directory into a destination directory, with configurable
//! output naming.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::batch::{BatchRunner, NamingPolicy};
use crate::commands::command_traits::Command;
use crate::crop::Region;
use crate::fits::errors::{FitsError, FitsResult};
use crate::utils::logger::Logger;

/// Command for batch-cropping FITS files
pub struct CropCommand<'a> {
    /// Source directory holding the FITS files
    source: PathBuf,
    /// Destination directory for cropped output
    destination: PathBuf,
    /// The crop rectangle
    region: Region,
    /// Output naming policy
    naming: NamingPolicy,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> CropCommand<'a> {
    /// Create a new crop command from CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new CropCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FitsResult<Self> {
        let source = args
            .get_one::<String>("input")
            .ok_or_else(|| FitsError::GenericError("Missing source directory".to_string()))?;
        info!("Source directory: {}", source);

        let destination = args
            .get_one::<String>("output")
            .ok_or_else(|| FitsError::GenericError("Missing destination directory".to_string()))?;
        info!("Destination directory: {}", destination);

        let region_str = args
            .get_one::<String>("region")
            .ok_or_else(|| FitsError::GenericError("Missing crop region".to_string()))?;
        let region = Region::parse(region_str)?;
        info!(
            "Crop region: x={}, y={}, width={}, height={}",
            region.x, region.y, region.width, region.height
        );

        let naming = if args.get_flag("keep-names") {
            NamingPolicy::KeepName
        } else {
            let prefix = args
                .get_one::<String>("prefix")
                .cloned()
                .unwrap_or_else(|| "cropped_".to_string());
            NamingPolicy::Prefix(prefix)
        };
        info!("Naming policy: {:?}", naming);

        Ok(CropCommand {
            source: PathBuf::from(source),
            destination: PathBuf::from(destination),
            region,
            naming,
            logger,
        })
    }
}

impl<'a> Command for CropCommand<'a> {
    fn execute(&self) -> FitsResult<()> {
        let runner = BatchRunner::new(self.region, self.naming.clone(), self.logger);
        let report = runner.run(&self.source, &self.destination)?;

        // Per-file skips and failures were already reported; only an
        // unusable destination aborts the batch, and that surfaced
        // from run() itself.
        self.logger.log(&format!(
            "Cropped {} of {} files",
            report.written(),
            report.outcomes.len()
        ))?;

        Ok(())
    }
}
