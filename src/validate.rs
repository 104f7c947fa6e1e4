//! Structural validation.
//!
//! Lineage validation is the universal post-condition of every pass: tests
//! run it in strict mode after each mutation. Marker validation and the
//! term limit are the two fatal gate checks of the error taxonomy.

use crate::ast::{marker, NodeId, NodeKind, QueryTree};
use crate::error::PlanError;

/// Check that every reachable node's recorded parent equals the node that
/// actually holds it as a child.
///
/// With `strict`, additionally require every compound child of a junction,
/// negation, or marker to be reference-wrapped (the canonical form later
/// passes assume).
pub fn validate_lineage(tree: &QueryTree, strict: bool) -> Result<(), PlanError> {
    for id in tree.preorder(tree.root()) {
        for child in tree.children(id) {
            if tree.parent(child) != Some(id) {
                return Err(PlanError::Lineage(format!(
                    "child '{}' does not record '{}' as its parent",
                    tree.display(child),
                    tree.display(id),
                )));
            }
            if strict && needs_wrapping(tree, id, child) {
                return Err(PlanError::Lineage(format!(
                    "compound child '{}' is not reference-wrapped",
                    tree.display(child),
                )));
            }
        }
    }
    Ok(())
}

fn needs_wrapping(tree: &QueryTree, parent: NodeId, child: NodeId) -> bool {
    let parent_wants_wrapping = matches!(
        tree.kind(parent),
        NodeKind::And(_) | NodeKind::Or(_) | NodeKind::Not(_) | NodeKind::Marker { .. }
    );
    let child_kind = tree.kind(child);
    parent_wants_wrapping && child_kind.is_compound() && !child_kind.is_grouping()
}

/// Walk the tree depth-first and fail on the first marker whose unwrapped
/// source is not exactly one expression, including nested markers.
///
/// Works on raw (wire-encoded) trees; a tree whose markers are already
/// decoded passes trivially, since the explicit variant cannot express a
/// malformed shape.
pub fn validate_markers(tree: &QueryTree) -> Result<(), PlanError> {
    let mut probe = tree.clone();
    marker::decode_markers(&mut probe)
}

/// Reject a flattened disjunction destined for range-building when its
/// leaf term count exceeds `limit`. Never truncates: the operation fails
/// outright.
pub fn enforce_term_limit(
    tree: &QueryTree,
    disjunction: NodeId,
    limit: usize,
) -> Result<usize, PlanError> {
    let count = tree
        .preorder(disjunction)
        .filter(|id| matches!(tree.kind(*id), NodeKind::Comparison { .. }))
        .count();
    if count > limit {
        return Err(PlanError::TermLimitExceeded { count, limit });
    }
    Ok(count)
}
