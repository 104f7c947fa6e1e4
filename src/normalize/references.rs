use crate::ast::{NodeId, NodeKind, QueryTree};

/// Wrap every compound child of a junction, negation, or marker in a
/// `Reference(ReferenceExpr(..))` pair, unless it already is wrapped.
///
/// The printed predicate is unchanged (the printer parenthesizes compound
/// junction children either way); this only pins the parenthesization into
/// the tree so it survives re-parsing. One pass suffices: a freshly wrapped
/// child is a grouping node and never needs wrapping again.
pub fn enforce_references(tree: &mut QueryTree) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();
    for id in ids {
        match tree.kind(id) {
            NodeKind::And(children) | NodeKind::Or(children) => {
                for child in children.clone() {
                    wrap_if_needed(tree, id, child);
                }
            }
            NodeKind::Not(child) => {
                let child = *child;
                wrap_if_needed(tree, id, child);
            }
            NodeKind::Marker { source, .. } => {
                let source = *source;
                wrap_if_needed(tree, id, source);
            }
            _ => {}
        }
    }
}

fn wrap_if_needed(tree: &mut QueryTree, parent: NodeId, child: NodeId) {
    let kind = tree.kind(child);
    if kind.is_grouping() || !kind.is_compound() {
        return;
    }
    let wrapped = tree.wrap_grouped(child);
    tree.replace_child(parent, child, wrapped);
}
