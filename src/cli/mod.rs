//! CLI support for sieve-plan
//!
//! Provides programmatic access to the `sieve` subcommands for embedding
//! in other tools.

mod analyze;
mod check;
mod normalize;

pub use analyze::{execute_analyze, AnalyzeReport, RangeReport};
pub use check::execute_check;
pub use normalize::execute_normalize;

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::metadata::{FieldMetadata, PlanConfig};
use crate::pipeline::Planner;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] crate::error::ParseError),

    #[error("Planning error: {0}")]
    Plan(#[from] crate::error::PlanError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No query provided. Pass one as an argument or pipe it to stdin.")]
    NoInput,
}

/// Build a planner from optional metadata and config files. Missing files
/// mean empty metadata / default config.
pub fn load_planner(
    metadata_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<Planner, CliError> {
    let metadata = match metadata_path {
        Some(path) => load_json::<FieldMetadata>(path)?,
        None => FieldMetadata::new(),
    };
    let config = match config_path {
        Some(path) => load_json::<PlanConfig>(path)?,
        None => PlanConfig::new(),
    };
    Ok(Planner::new(metadata, config))
}

/// Deserialize a JSON file into any of the collaborator input types.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
