use crate::analyze::{collect_patterns, PatternCache};
use crate::cli::CliError;
use crate::parser::parse_predicate;
use crate::validate::validate_markers;

/// Validate a predicate without planning it: syntax, marker
/// well-formedness, and regex pattern syntax.
pub fn execute_check(query: &str) -> Result<(), CliError> {
    let tree = parse_predicate(query)?;
    validate_markers(&tree)?;
    let mut cache = PatternCache::new();
    collect_patterns(&tree, &mut cache)?;
    Ok(())
}
