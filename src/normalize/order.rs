use crate::ast::{NodeId, NodeKind, QueryTree};

/// Put the field on the left of every comparison.
///
/// `'bar' == FOO` becomes `FOO == 'bar'`; order-sensitive operators switch
/// to their mathematical mirror, so `'10' > FOO` becomes `FOO < '10'`.
/// Comparisons that are already field-first, field-to-field, or
/// literal-to-literal are untouched.
pub fn normalize_comparison_order(tree: &mut QueryTree) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();
    for id in ids {
        let NodeKind::Comparison { op, left, right } = tree.kind(id).clone() else {
            continue;
        };
        let literal_left = tree.literal_at(left).is_some();
        let identifier_right = tree.identifier_at(right).is_some();
        if literal_left && identifier_right {
            tree.set_kind(
                id,
                NodeKind::Comparison {
                    op: op.mirror(),
                    left: right,
                    right: left,
                },
            );
        }
    }
}
