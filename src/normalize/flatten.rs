use crate::ast::{NodeId, NodeKind, QueryTree};

/// Flatten adjacent same-kind junctions into one n-ary node, looking
/// through grouping wrappers, and collapse single-child junctions into
/// their child.
///
/// `(A && (B && C)) && D` becomes `A && B && C && D`. Rewrites that
/// introduce new junctions re-run this to re-establish canonical form.
pub fn flatten_junctions(tree: &mut QueryTree) {
    let Some(statement) = tree.statement() else {
        return;
    };
    let flattened = flatten_node(tree, statement);
    if flattened != statement {
        tree.set_statement(flattened);
    }
}

fn flatten_node(tree: &mut QueryTree, id: NodeId) -> NodeId {
    match tree.kind(id).clone() {
        NodeKind::And(children) => flatten_junction(tree, id, children, true),
        NodeKind::Or(children) => flatten_junction(tree, id, children, false),
        _ => {
            for child in tree.children(id) {
                let flattened = flatten_node(tree, child);
                if flattened != child {
                    tree.replace_child(id, child, flattened);
                }
            }
            id
        }
    }
}

fn flatten_junction(
    tree: &mut QueryTree,
    id: NodeId,
    children: Vec<NodeId>,
    conjunction: bool,
) -> NodeId {
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        let child = flatten_node(tree, child);
        let inner = tree.unwrap_grouping(child);
        match (tree.kind(inner).clone(), conjunction) {
            (NodeKind::And(grandchildren), true) | (NodeKind::Or(grandchildren), false) => {
                flat.extend(grandchildren);
            }
            _ => flat.push(child),
        }
    }
    if flat.len() == 1 {
        return flat[0];
    }
    let kind = if conjunction {
        NodeKind::And(flat)
    } else {
        NodeKind::Or(flat)
    };
    tree.set_kind(id, kind);
    id
}
