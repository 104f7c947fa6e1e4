//! Canonicalization passes.
//!
//! These passes normalize the shape of a freshly parsed (and marker-decoded)
//! tree without changing its evaluated meaning. Every later rewrite and
//! analysis pass assumes they have run:
//!
//! - **[flatten]** - adjacent same-kind junctions become one n-ary node
//! - **[references]** - compound junction children get reference-wrapped
//! - **[order]** - comparisons become field-first
//! - **[case]** - known field names are upper-cased
//! - **[literals]** - signed and quoted-numeric literals are fixed up
//!
//! All of them are idempotent: re-running one on an already-canonical tree
//! is a no-op.

pub mod case;
pub mod flatten;
pub mod literals;
pub mod order;
pub mod references;

pub use case::normalize_field_case;
pub use flatten::flatten_junctions;
pub use literals::fix_numeric_literals;
pub use order::normalize_comparison_order;
pub use references::enforce_references;
