//! Semantics-preserving rewrite passes.
//!
//! Each pass consumes and produces the same tree representation, preserves
//! the evaluated meaning of the predicate, and leaves lineage valid. Order
//! between passes matters in places and is fixed by
//! [`crate::pipeline::Planner`]; each pass is independently re-entrant.
//!
//! - **[hints]** - strip internal planner hints, collapsing emptied junctions
//! - **[intent]** - turn universal-regex equality into an explicit not-null
//! - **[evaluation]** - tag field-to-field comparisons as evaluation-only
//! - **[distribute]** - push an indexed conjunct into a disjunction
//! - **[expansion]** - extract `f:noExpansion(..)` directives
//! - **[geo]** - prune over-covering geospatial index terms

pub mod distribute;
pub mod evaluation;
pub mod expansion;
pub mod geo;
pub mod hints;
pub mod intent;
mod prune;

pub use distribute::distribute_indexed_terms;
pub use evaluation::force_field_comparisons_to_evaluation;
pub use expansion::extract_no_expansion;
pub use geo::prune_geo_terms;
pub use hints::remove_hints;
pub use intent::rewrite_is_not_null_intent;
