use tracing::debug;

use crate::ast::{marker, MarkerKind, NodeId, NodeKind, QueryTree};

/// Tag every field-to-field comparison with an evaluation-only marker.
///
/// A comparison with a field identifier on both sides (`FOO < BAR`) cannot
/// be resolved via an index: an index maps one field's values to records,
/// and no single lookup constrains two fields against each other. The
/// marker tells the planner to never attempt an index lookup for the
/// comparison. Field-vs-literal and field-vs-function comparisons are not
/// touched here.
pub fn force_field_comparisons_to_evaluation(tree: &mut QueryTree) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();
    for id in ids {
        let NodeKind::Comparison { left, right, .. } = tree.kind(id) else {
            continue;
        };
        if tree.identifier_at(*left).is_none() || tree.identifier_at(*right).is_none() {
            continue;
        }
        if inside_evaluation_marker(tree, id) {
            continue;
        }

        debug!(comparison = %tree.display(id), "forcing field-to-field comparison to evaluation");

        let parent = tree.parent(id);
        let wrapped = marker::wrap(tree, MarkerKind::EvaluationOnly, id);
        match parent {
            Some(parent) => tree.replace_child(parent, id, wrapped),
            None => tree.set_statement(wrapped),
        }
    }
}

/// Whether the nearest non-grouping ancestor is already an evaluation-only
/// marker; keeps the pass idempotent.
fn inside_evaluation_marker(tree: &QueryTree, mut id: NodeId) -> bool {
    while let Some(parent) = tree.parent(id) {
        match tree.kind(parent) {
            NodeKind::Reference(_) | NodeKind::ReferenceExpr(_) => id = parent,
            NodeKind::Marker {
                kind: MarkerKind::EvaluationOnly,
                ..
            } => return true,
            _ => return false,
        }
    }
    false
}
