//! Pass orchestration.
//!
//! [`Planner`] runs the full normalization pipeline in its documented
//! order. Each pass is independently re-entrant, but order matters in
//! places: markers must be decoded before junctions are flattened (the
//! wire encoding is itself a conjunction), literal fixing must collapse
//! `Negative(Number)` operands before operand-order normalization looks
//! for a literal side (`-3 < FOO` must still swap), operand order must
//! be normalized before passes that expect field-first comparisons, and
//! reference enforcement runs last so every rewrite's output ends up
//! wrapped.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ast::{marker, QueryTree};
use crate::error::PlanError;
use crate::metadata::{FieldMetadata, PlanConfig};
use crate::normalize;
use crate::parser::parse_predicate;
use crate::rewrite;

/// Runs the normalization pipeline for one predicate at a time.
///
/// Holds only read-only collaborator state, so one planner can serve
/// concurrent planning requests; each invocation owns its tree.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    metadata: FieldMetadata,
    config: PlanConfig,
}

/// A normalized predicate plus the auxiliary pass outputs the planner
/// consumes alongside it.
#[derive(Debug)]
pub struct NormalizedQuery {
    /// The transformed tree: lineage-valid, reference-wrapped, canonical.
    pub tree: QueryTree,
    /// Fields excluded from future term expansion via `f:noExpansion`.
    pub no_expansion_fields: HashSet<String>,
    /// Geo terms pruned as redundant, per field, for observability.
    pub pruned_geo_terms: HashMap<String, Vec<String>>,
}

impl Planner {
    pub fn new(metadata: FieldMetadata, config: PlanConfig) -> Self {
        Planner { metadata, config }
    }

    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Parse and normalize a predicate.
    ///
    /// Fatal conditions (parse errors, malformed markers) propagate
    /// immediately; no partial result is produced.
    pub fn plan(&self, source: &str) -> Result<NormalizedQuery, PlanError> {
        let tree = parse_predicate(source)?;
        self.plan_tree(tree)
    }

    /// Normalize an already-parsed raw tree.
    pub fn plan_tree(&self, mut tree: QueryTree) -> Result<NormalizedQuery, PlanError> {
        marker::decode_markers(&mut tree)?;
        normalize::flatten_junctions(&mut tree);
        normalize::normalize_field_case(&mut tree, &self.metadata);
        normalize::fix_numeric_literals(&mut tree, &self.metadata);
        normalize::normalize_comparison_order(&mut tree);

        rewrite::remove_hints(&mut tree);
        rewrite::rewrite_is_not_null_intent(&mut tree);
        let no_expansion_fields = rewrite::extract_no_expansion(&mut tree);
        rewrite::force_field_comparisons_to_evaluation(&mut tree);
        rewrite::distribute_indexed_terms(&mut tree, &self.metadata);
        let pruned_geo_terms = rewrite::prune_geo_terms(&mut tree, &self.metadata);

        // Rewrites may have introduced junctions or unwrapped children;
        // re-establish canonical form before handing the tree on.
        normalize::flatten_junctions(&mut tree);
        normalize::enforce_references(&mut tree);

        debug!(normalized = %tree, "predicate normalized");

        Ok(NormalizedQuery {
            tree,
            no_expansion_fields,
            pruned_geo_terms,
        })
    }
}
