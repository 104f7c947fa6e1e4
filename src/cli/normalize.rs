use crate::cli::CliError;
use crate::pipeline::{NormalizedQuery, Planner};

/// Run the full normalization pipeline over a predicate.
pub fn execute_normalize(planner: &Planner, query: &str) -> Result<NormalizedQuery, CliError> {
    Ok(planner.plan(query)?)
}
