use crate::ast::{NodeId, NodeKind, QueryTree};

/// Remove every node (looked at through grouping wrappers) for which
/// `doomed` returns true, then collapse what is left: a junction with one
/// survivor is replaced by that survivor, a junction with none is removed
/// itself, recursively up to the root. A tree pruned to nothing becomes the
/// empty predicate.
pub(crate) fn prune_where(tree: &mut QueryTree, doomed: &dyn Fn(&QueryTree, NodeId) -> bool) {
    let Some(statement) = tree.statement() else {
        return;
    };
    match prune_node(tree, statement, doomed) {
        Some(kept) => {
            if kept != statement {
                tree.set_statement(kept);
            }
        }
        None => tree.clear_statement(),
    }
}

/// Returns the surviving replacement for `id`, or `None` when the whole
/// sub-tree goes away.
fn prune_node(
    tree: &mut QueryTree,
    id: NodeId,
    doomed: &dyn Fn(&QueryTree, NodeId) -> bool,
) -> Option<NodeId> {
    let inner = tree.unwrap_grouping(id);
    if doomed(tree, inner) {
        return None;
    }
    match tree.kind(inner).clone() {
        NodeKind::And(children) | NodeKind::Or(children) => {
            let conjunction = matches!(tree.kind(inner), NodeKind::And(_));
            let mut kept = Vec::with_capacity(children.len());
            for child in children {
                if let Some(survivor) = prune_node(tree, child, doomed) {
                    kept.push(survivor);
                }
            }
            match kept.len() {
                0 => None,
                1 => Some(kept[0]),
                _ => {
                    let kind = if conjunction {
                        NodeKind::And(kept)
                    } else {
                        NodeKind::Or(kept)
                    };
                    tree.set_kind(inner, kind);
                    Some(id)
                }
            }
        }
        NodeKind::Not(child) => {
            // A negation whose operand is pruned disappears with it.
            let survivor = prune_node(tree, child, doomed)?;
            if survivor != child {
                tree.replace_child(inner, child, survivor);
            }
            Some(id)
        }
        NodeKind::Marker { source, .. } => {
            let survivor = prune_node(tree, source, doomed)?;
            if survivor != source {
                tree.replace_child(inner, source, survivor);
            }
            Some(id)
        }
        _ => Some(id),
    }
}
