use std::collections::HashSet;

use tracing::debug;

use crate::ast::{NodeId, NodeKind, QueryTree};
use crate::functions;
use crate::rewrite::prune::prune_where;

/// Extract `f:noExpansion(FIELD, ...)` directives.
///
/// The call marks its argument fields as excluded from future term
/// expansion. It carries no filtering semantics of its own, so the call
/// nodes are removed from the tree (collapsing emptied junctions like hint
/// cleanup does) and the excluded field names are returned for the planner.
pub fn extract_no_expansion(tree: &mut QueryTree) -> HashSet<String> {
    let mut excluded = HashSet::new();
    for id in tree.preorder(tree.root()) {
        if let Some(fields) = no_expansion_fields(tree, id) {
            excluded.extend(fields);
        }
    }
    if excluded.is_empty() {
        return excluded;
    }

    debug!(fields = ?excluded, "extracting no-expansion directive");

    prune_where(tree, &|tree, id| no_expansion_fields(tree, id).is_some());
    excluded
}

fn no_expansion_fields(tree: &QueryTree, id: NodeId) -> Option<Vec<String>> {
    let NodeKind::FunctionCall {
        namespace,
        name,
        args,
    } = tree.kind(id)
    else {
        return None;
    };
    if namespace.as_deref() != Some(functions::PLANNER_NAMESPACE)
        || name != functions::NO_EXPANSION
    {
        return None;
    }
    Some(
        args.iter()
            .filter_map(|arg| tree.identifier_at(*arg).map(str::to_string))
            .collect(),
    )
}
