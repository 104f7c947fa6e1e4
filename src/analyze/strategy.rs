use crate::ast::{MarkerKind, NodeKind, QueryTree};

/// Whether the tree carries a marker that forces the disk-backed
/// evaluation strategy.
///
/// An over-threshold term list (`_Term_`) or value count (`_Value_`) means
/// in-memory expansion would blow the configured thresholds; the planner
/// must stream the evaluation from disk instead. A materialized `_List_`
/// disjunction stays in-memory evaluable and does not trigger the
/// fallback.
pub fn requires_disk_backed_evaluation(tree: &QueryTree) -> bool {
    tree.preorder(tree.root()).any(|id| {
        matches!(
            tree.kind(id),
            NodeKind::Marker {
                kind: MarkerKind::ExceededTerm | MarkerKind::ExceededValue,
                ..
            }
        )
    })
}
