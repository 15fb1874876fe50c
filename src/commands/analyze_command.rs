//! FITS inspection command
//!
//! This module implements the command for inspecting the structure of
//! a single FITS file: HDU inventory, dimensions, sample type, curated
//! metadata and coordinate-system presence. Useful for picking a crop
//! region before running a batch.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::fits::errors::{FitsError, FitsResult};
use crate::utils::logger::Logger;

/// Command for inspecting FITS file structure
pub struct AnalyzeCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> FitsResult<Self> {
        let input_file = args
            .get_one::<String>("input")
            .ok_or_else(|| FitsError::GenericError("Missing input file".to_string()))?
            .clone();
        info!("Input file: {}", input_file);

        Ok(AnalyzeCommand { input_file, logger })
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> FitsResult<()> {
        let api = crate::api::FitsCrop::new(None)?;
        let summary = api.analyze(std::path::Path::new(&self.input_file))?;

        println!("{}", summary);
        self.logger.log(&format!("Analyzed {}", self.input_file))?;

        Ok(())
    }
}
