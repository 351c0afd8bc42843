//! CSV input and sweep artifact output for yardstick.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use reader::ObservationReader;
pub use writer::{lookups_to_json, SweepWriter};
