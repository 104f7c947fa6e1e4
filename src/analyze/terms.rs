use std::collections::HashSet;

use crate::ast::{NodeKind, QueryTree};

/// Count comparison leaves whose field is in `fields`.
///
/// Used for planner cost estimation: each such leaf is a candidate index
/// scan. Field-to-field and constant comparisons never count.
pub fn count_indexed_terms(tree: &QueryTree, fields: &HashSet<String>) -> usize {
    tree.preorder(tree.root())
        .filter(|id| {
            matches!(tree.kind(*id), NodeKind::Comparison { .. })
                && matches!(tree.comparison_term(*id), Some((field, _)) if fields.contains(field))
        })
        .count()
}
