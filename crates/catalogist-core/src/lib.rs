//! Table models, configuration, input discovery and CSV export for catalogist.

pub mod config;
pub mod error;
pub mod export;
pub mod inputs;
pub mod models;

pub use config::{AppConfig, HeuristicsConfig, LookupConfig, OutputConfig};
pub use error::{CoreError, ExitCode, Result};
pub use inputs::{InputSet, collect_inputs, is_xml_file};
pub use models::*;
