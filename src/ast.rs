//! # Sieve Query Language - Predicate Tree
//!
//! This module defines the tree representation that every normalization,
//! rewrite, and analysis pass in this crate operates on. A submitted filter
//! predicate is parsed once into a [`tree::QueryTree`], threaded through the
//! planning pipeline, and discarded when the planner is done with it.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[node]** - Node kinds, literals, and node identifiers
//! - **[operators]** - Comparison operators and their mirror/negation tables
//! - **[tree]** - The arena that owns the nodes and tracks lineage
//! - **[marker]** - Planner-metadata markers attached to sub-trees
//! - **[display]** - Stable string serialization (round-trips the parser)
//!
//! ## Core Concepts
//!
//! ### Arena addressing
//!
//! Nodes are stored in a flat arena and addressed by [`node::NodeId`].
//! Parent and child relationships are stored as ids, never as references,
//! so rebuilding a sub-tree is "allocate new nodes, relink ids". Nodes that
//! become unreachable stay in the arena as garbage until the whole tree is
//! dropped at the end of the planning request.
//!
//! ### Lineage
//!
//! Every node records its parent id. After any mutation the invariant must
//! hold that a node's recorded parent is the node that actually holds it as
//! a child; [`crate::validate::validate_lineage`] checks this from the root.
//!
//! ### Grouping wrappers
//!
//! `Reference(ReferenceExpr(..))` pairs carry parenthesization. They never
//! change the evaluated meaning of a predicate, and any logic that reasons
//! about meaning (negation sense, satisfaction, hashing) looks through them
//! via [`tree::QueryTree::unwrap_grouping`].
//!
//! ### Markers
//!
//! Planner metadata rides on the tree as [`node::NodeKind::Marker`] nodes.
//! On the wire a marker is the conjunction `(_Label_ = true) && source`; the
//! decode pass turns that shape into the explicit variant. See [marker].
pub mod display;
pub mod marker;
pub mod node;
pub mod operators;
pub mod tree;

pub use marker::MarkerKind;
pub use node::{Literal, Node, NodeId, NodeKind};
pub use operators::ComparisonOp;
pub use tree::QueryTree;
