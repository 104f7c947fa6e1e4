use crate::ast::{Literal, NodeId, NodeKind, QueryTree};
use crate::ast::operators::ComparisonOp;

/// Regex forms that match any value at all.
const UNIVERSAL_PATTERNS: [&str; 2] = [".*", ".*?"];

/// Rewrite `FIELD =~ '.*'` (and the lazy `'.*?'` form) into the explicit
/// `FIELD != null`.
///
/// A universal pattern only asks "does the field have a value", and the
/// not-null form answers that without a regex scan over every indexed value
/// of the field. All other regex comparisons are left untouched.
pub fn rewrite_is_not_null_intent(tree: &mut QueryTree) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();
    for id in ids {
        let NodeKind::Comparison { op, left, right } = tree.kind(id).clone() else {
            continue;
        };
        if op != ComparisonOp::Matches {
            continue;
        }
        let (field_side, pattern_side) = match (tree.identifier_at(left), tree.identifier_at(right))
        {
            (Some(_), None) => (left, right),
            (None, Some(_)) => (right, left),
            _ => continue,
        };
        let universal = matches!(
            tree.literal_at(pattern_side),
            Some(Literal::String(pattern)) if UNIVERSAL_PATTERNS.contains(&pattern.as_str())
        );
        if !universal {
            continue;
        }
        let null = tree.alloc(NodeKind::Literal(Literal::Null));
        tree.set_kind(
            id,
            NodeKind::Comparison {
                op: ComparisonOp::Ne,
                left: field_side,
                right: null,
            },
        );
    }
}
