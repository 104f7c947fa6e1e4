//! Read-only analysis passes.
//!
//! Unlike the rewrites, nothing here mutates the tree. Each analysis
//! answers one planner question about a normalized predicate:
//!
//! - **[range]** - must a marker-wrapped bounded range be term-expanded?
//! - **[satisfaction]** - is the predicate computable from available data?
//! - **[strategy]** - must the planner fall back to disk-backed evaluation?
//! - **[terms]** - how many indexed comparison leaves does the tree hold?
//! - **[patterns]** - which regex patterns appear, and are they valid?
//! - **[negation]** - is the predicate negated at the top level?
//! - **[hashing]** - order-insensitive structural fingerprinting

pub mod hashing;
pub mod negation;
pub mod patterns;
pub mod range;
pub mod satisfaction;
pub mod strategy;
pub mod terms;

pub use hashing::canonical_hash;
pub use negation::is_root_negated;
pub use patterns::{collect_patterns, PatternCache};
pub use range::{bounded_range, detect_bounded_ranges, range_must_expand, BoundedRange};
pub use satisfaction::is_satisfied;
pub use strategy::requires_disk_backed_evaluation;
pub use terms::count_indexed_terms;
