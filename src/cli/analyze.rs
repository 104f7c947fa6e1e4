use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::analyze::{
    canonical_hash, collect_patterns, count_indexed_terms, detect_bounded_ranges, is_root_negated,
    is_satisfied, range_must_expand, requires_disk_backed_evaluation, PatternCache,
};
use crate::cli::CliError;
use crate::metadata::SatisfactionSets;
use crate::pipeline::Planner;

/// One bounded range found in the predicate.
#[derive(Debug, Serialize)]
pub struct RangeReport {
    pub field: String,
    pub must_expand: bool,
}

/// Analysis verdicts over a normalized predicate, printable as JSON.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    pub normalized: String,
    pub satisfied: bool,
    pub root_negated: bool,
    pub disk_backed: bool,
    pub indexed_terms: usize,
    pub patterns: HashMap<String, Vec<String>>,
    pub bounded_ranges: Vec<RangeReport>,
    pub no_expansion_fields: Vec<String>,
    pub pruned_geo_terms: HashMap<String, Vec<String>>,
    pub fingerprint: String,
}

/// Normalize a predicate and run every analysis pass over the result.
pub fn execute_analyze(
    planner: &Planner,
    sets: &SatisfactionSets,
    query: &str,
) -> Result<AnalyzeReport, CliError> {
    let normalized = planner.plan(query)?;
    let tree = &normalized.tree;

    let mut cache = PatternCache::new();
    let patterns = collect_patterns(tree, &mut cache)?;
    let indexed: HashSet<String> = planner.metadata().indexed.clone();

    let bounded_ranges = detect_bounded_ranges(tree)?
        .into_iter()
        .map(|(_, range)| RangeReport {
            must_expand: range_must_expand(&range, planner.config()),
            field: range.field,
        })
        .collect();

    let mut no_expansion_fields: Vec<String> =
        normalized.no_expansion_fields.into_iter().collect();
    no_expansion_fields.sort();

    Ok(AnalyzeReport {
        normalized: tree.to_string(),
        satisfied: is_satisfied(tree, sets),
        root_negated: is_root_negated(tree),
        disk_backed: requires_disk_backed_evaluation(tree),
        indexed_terms: count_indexed_terms(tree, &indexed),
        patterns,
        bounded_ranges,
        no_expansion_fields,
        pruned_geo_terms: normalized.pruned_geo_terms,
        fingerprint: format!("{:016x}", canonical_hash(tree)),
    })
}
