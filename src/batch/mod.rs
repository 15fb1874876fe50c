//! Batch crop driver
//!
//! Iterates the FITS files of a source directory, runs each one through
//! the crop engine independently, and persists successful results. One
//! file's skip or failure never affects another file's run; only an
//! unusable destination aborts the batch.

use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::crop::{CropEngine, CropOutcome, Region};
use crate::fits::constants::FITS_EXTENSIONS;
use crate::fits::errors::{FitsError, FitsResult};
use crate::fits::writer::{FitsWriter, ValidationMode};
use crate::utils::logger::Logger;
use crate::utils::progress::ProgressTracker;

/// How an output file is named from its source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Prefix the source name (the conventional `cropped_` marker)
    Prefix(String),
    /// Reuse the source name unchanged
    KeepName,
}

impl NamingPolicy {
    /// The output file name for a given source file name
    pub fn output_name(&self, source_name: &str) -> String {
        match self {
            NamingPolicy::Prefix(prefix) => format!("{}{}", prefix, source_name),
            NamingPolicy::KeepName => source_name.to_string(),
        }
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        NamingPolicy::Prefix("cropped_".to_string())
    }
}

/// Terminal status of one file in the batch
#[derive(Debug)]
pub enum FileStatus {
    /// Cropped and written to this path
    Written(PathBuf),
    /// Skipped with a reason; no output was produced
    Skipped(String),
    /// Failed with a reason; no output was produced
    Failed(String),
}

/// One file's name and its outcome
#[derive(Debug)]
pub struct FileOutcome {
    /// Source file name (without directory)
    pub file_name: String,
    /// What happened to it
    pub status: FileStatus,
}

/// Structured result of a whole batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-file outcomes in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of files cropped and written
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Written(_)))
            .count()
    }

    /// Number of files skipped
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Skipped(_)))
            .count()
    }

    /// Number of files that failed
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Failed(_)))
            .count()
    }
}

/// Runs the crop engine over every FITS file in a directory
pub struct BatchRunner<'a> {
    /// The crop rectangle applied to every file
    region: Region,
    /// Output naming policy
    naming: NamingPolicy,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> BatchRunner<'a> {
    /// Create a new batch runner
    pub fn new(region: Region, naming: NamingPolicy, logger: &'a Logger) -> Self {
        BatchRunner {
            region,
            naming,
            logger,
        }
    }

    /// Crop every FITS file in `source` into `destination`
    ///
    /// The destination directory is created if absent; failing to
    /// create it is the only batch-fatal condition. Files are
    /// processed in sorted name order for deterministic output.
    ///
    /// # Returns
    /// A report with one outcome per file, or `DestinationUnwritable`
    pub fn run(&self, source: &Path, destination: &Path) -> FitsResult<BatchReport> {
        fs::create_dir_all(destination).map_err(|e| {
            FitsError::DestinationUnwritable(format!("{}: {}", destination.display(), e))
        })?;
        info!("Destination folder ready: {}", destination.display());

        let files = collect_fits_files(source)?;
        info!("Found {} FITS files in {}", files.len(), source.display());

        let progress = ProgressTracker::new(files.len() as u64, "Cropping");
        let mut report = BatchReport::default();

        for path in &files {
            let outcome = self.process_file(path, destination);
            progress.set_message(&outcome.file_name);
            progress.increment(1);
            report.outcomes.push(outcome);
        }

        let summary = format!(
            "Batch complete: {} written, {} skipped, {} failed",
            report.written(),
            report.skipped(),
            report.failed()
        );
        progress.finish(&summary);
        info!("{}", summary);
        self.logger.log(&summary)?;

        Ok(report)
    }

    /// Run one file through the engine and persist its result
    fn process_file(&self, path: &Path, destination: &Path) -> FileOutcome {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Processing file: {}", file_name);

        let status = match CropEngine::crop_file(path, &self.region) {
            CropOutcome::Done(result) => {
                let output_path = destination.join(self.naming.output_name(&file_name));
                match FitsWriter::write(
                    &output_path,
                    &result.pixels,
                    &result.header,
                    true,
                    ValidationMode::Fix,
                ) {
                    Ok(()) => {
                        info!("Cropped and saved: {}", output_path.display());
                        FileStatus::Written(output_path)
                    }
                    Err(e) => {
                        error!("Error writing {}: {}", output_path.display(), e);
                        FileStatus::Failed(e.to_string())
                    }
                }
            }
            CropOutcome::Skipped(reason) => {
                warn!("Skipping {}: {}", file_name, reason);
                FileStatus::Skipped(reason)
            }
            CropOutcome::Failed(reason) => {
                error!("Error processing {}: {}", file_name, reason);
                FileStatus::Failed(reason)
            }
        };

        FileOutcome { file_name, status }
    }
}

/// Returns true if the path carries a recognized FITS extension
pub fn is_fits_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            FITS_EXTENSIONS.iter().any(|known| *known == lower)
        })
        .unwrap_or(false)
}

/// FITS files of a directory in sorted name order
fn collect_fits_files(source: &Path) -> FitsResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_fits_file(path))
        .collect();
    files.sort();
    Ok(files)
}
