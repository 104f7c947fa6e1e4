//! Planner-metadata markers.
//!
//! A marker attaches metadata to a sub-tree without changing its evaluated
//! meaning. On the wire a marker is the conjunction
//! `(_Label_ = true) && source`; inside the tree it is the explicit
//! [`NodeKind::Marker`] variant, which eliminates shape-sniffing from every
//! downstream pass. [`decode_markers`] performs the wire-to-variant
//! conversion after parsing and is where malformed encodings surface.

use crate::ast::node::{Literal, NodeId, NodeKind};
use crate::ast::tree::QueryTree;
use crate::error::PlanError;

/// The closed set of marker kinds, each with its reserved wire label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Wraps a pair of inequality bounds on one field that may need to be
    /// expanded into an explicit term enumeration.
    Bounded,
    /// Wraps a sub-tree whose evaluation is deferred past index lookup.
    Delayed,
    /// Wraps a sub-tree that can never be resolved from an index and must
    /// be evaluated against the record itself.
    EvaluationOnly,
    /// Wraps a term list that exceeded the configured term threshold.
    ExceededTerm,
    /// Wraps a sub-tree whose value expansion exceeded the configured
    /// value threshold.
    ExceededValue,
    /// Wraps a disjunction that was materialized into an external list.
    ExceededOr,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 6] = [
        MarkerKind::Bounded,
        MarkerKind::Delayed,
        MarkerKind::EvaluationOnly,
        MarkerKind::ExceededTerm,
        MarkerKind::ExceededValue,
        MarkerKind::ExceededOr,
    ];

    /// Reserved assignment name carrying this marker in source text.
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Bounded => "_Bounded_",
            MarkerKind::Delayed => "_Delayed_",
            MarkerKind::EvaluationOnly => "_Eval_",
            MarkerKind::ExceededTerm => "_Term_",
            MarkerKind::ExceededValue => "_Value_",
            MarkerKind::ExceededOr => "_List_",
        }
    }

    pub fn from_label(label: &str) -> Option<MarkerKind> {
        MarkerKind::ALL.into_iter().find(|k| k.label() == label)
    }
}

/// Attach a marker of `kind` to `source`, reference-wrapping the source when
/// its shape needs parens to print unambiguously. Returns the marker node,
/// unattached.
pub fn wrap(tree: &mut QueryTree, kind: MarkerKind, source: NodeId) -> NodeId {
    let source = if tree.kind(source).is_compound() && !tree.kind(source).is_grouping() {
        tree.wrap_grouped(source)
    } else {
        source
    };
    tree.alloc(NodeKind::Marker { kind, source })
}

/// The marked sub-tree behind `marker`, with grouping wrappers stripped.
///
/// Returns `None` when `marker` is not a marker node.
pub fn unwrap(tree: &QueryTree, marker: NodeId) -> Option<(MarkerKind, NodeId)> {
    match tree.kind(marker) {
        NodeKind::Marker { kind, source } => Some((*kind, tree.unwrap_grouping(*source))),
        _ => None,
    }
}

/// All markers of `kind` reachable from the root, as `(marker, source)`
/// pairs in depth-first pre-order. Pre-order is the canonical order for
/// "first offending marker" reporting.
pub fn find_all(tree: &QueryTree, kind: MarkerKind) -> Vec<(NodeId, NodeId)> {
    tree.preorder(tree.root())
        .filter_map(|id| match unwrap(tree, id) {
            Some((k, source)) if k == kind => Some((id, source)),
            _ => None,
        })
        .collect()
}

/// How an `And` node relates to the marker encoding.
enum MarkerShape {
    /// No marker assignment among the children.
    Plain,
    /// `(label, source)` - exactly one marker assignment and one source.
    WellFormed(MarkerKind, NodeId),
    /// A marker assignment with zero or several source siblings.
    Malformed(MarkerKind, usize),
}

fn classify_and(tree: &QueryTree, children: &[NodeId]) -> MarkerShape {
    let mut marker = None;
    let mut sources = Vec::new();
    for child in children {
        match marker_assignment(tree, *child) {
            Some(kind) if marker.is_none() => marker = Some(kind),
            // Second marker assignment in the same conjunction: treat it as
            // a source so the count comes out wrong and the shape is fatal.
            Some(_) => sources.push(*child),
            None => sources.push(*child),
        }
    }
    match marker {
        None => MarkerShape::Plain,
        Some(kind) if sources.len() == 1 => MarkerShape::WellFormed(kind, sources[0]),
        Some(kind) => MarkerShape::Malformed(kind, sources.len()),
    }
}

/// `Some(kind)` when the node (through grouping) is `_Label_ = true`.
fn marker_assignment(tree: &QueryTree, id: NodeId) -> Option<MarkerKind> {
    let NodeKind::Assignment { name, value } = tree.kind(tree.unwrap_grouping(id)) else {
        return None;
    };
    let kind = MarkerKind::from_label(name)?;
    match tree.literal_at(*value) {
        Some(Literal::Boolean(true)) => Some(kind),
        _ => None,
    }
}

/// Convert every wire-encoded marker conjunction into the explicit
/// [`NodeKind::Marker`] variant, in place.
///
/// Fails with a malformed-query error naming the first (pre-order) marker
/// whose source does not resolve to exactly one expression. Nested markers
/// are decoded wherever they appear.
pub fn decode_markers(tree: &mut QueryTree) -> Result<(), PlanError> {
    let ands: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|id| matches!(tree.kind(*id), NodeKind::And(_)))
        .collect();
    for and in ands {
        let NodeKind::And(children) = tree.kind(and).clone() else {
            continue;
        };
        match classify_and(tree, &children) {
            MarkerShape::Plain => {}
            MarkerShape::WellFormed(kind, source) => {
                tree.set_kind(and, NodeKind::Marker { kind, source });
            }
            MarkerShape::Malformed(kind, count) => {
                return Err(PlanError::MalformedQuery(format!(
                    "marker {} must wrap exactly one expression, found {}",
                    kind.label(),
                    count
                )));
            }
        }
    }
    // Decoding consumes every well-formed marker assignment, so one that is
    // still reachable from the root never had a conjunction to wrap.
    let dangling = tree
        .preorder(tree.root())
        .find_map(|id| marker_assignment(tree, id));
    if let Some(kind) = dangling {
        return Err(PlanError::MalformedQuery(format!(
            "marker {} must wrap exactly one expression, found 0",
            kind.label()
        )));
    }
    Ok(())
}
