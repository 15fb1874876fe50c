pub mod fits;
pub mod wcs;
pub mod crop;
pub mod batch;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::FitsCrop;

pub use fits::{FitsFile, FitsReader, FitsWriter, Header, Value};
pub use crop::{CropEngine, CropOutcome, CropResult, Region};
pub use batch::{BatchReport, BatchRunner, NamingPolicy};
