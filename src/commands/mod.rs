//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod analyze_command;
pub mod crop_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use crop_command::CropCommand;

use clap::ArgMatches;
use crate::fits::errors::FitsResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct FitscropCommandFactory;

impl FitscropCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        FitscropCommandFactory
    }
}

impl Default for FitscropCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for FitscropCommandFactory {
    fn create_command(
        &self,
        args: &ArgMatches,
        logger: &'a Logger,
    ) -> FitsResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.get_flag("analyze") {
            Ok(Box::new(AnalyzeCommand::new(args, logger)?))
        } else {
            // Default to the batch crop command
            Ok(Box::new(CropCommand::new(args, logger)?))
        }
    }
}
