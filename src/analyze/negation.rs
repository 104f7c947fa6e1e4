use crate::ast::{NodeId, NodeKind, QueryTree};

/// Whether the predicate is logically negated at the top level.
///
/// Markers are transparent (a marker-wrapped sub-tree's negation sense is
/// that of its source), double negation cancels, and a bare `!=`/`!~`
/// comparison at the root counts as a top-level negation. Junctions are
/// not negations regardless of their children.
pub fn is_root_negated(tree: &QueryTree) -> bool {
    match tree.statement() {
        Some(statement) => negated(tree, statement, false),
        None => false,
    }
}

fn negated(tree: &QueryTree, id: NodeId, sense: bool) -> bool {
    match tree.kind(tree.unwrap_grouping(id)) {
        NodeKind::Not(child) => negated(tree, *child, !sense),
        NodeKind::Marker { source, .. } => negated(tree, *source, sense),
        NodeKind::Comparison { op, .. } => sense != op.is_negative(),
        _ => sense,
    }
}
