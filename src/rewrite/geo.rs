use std::collections::HashMap;

use tracing::debug;

use crate::ast::{Literal, NodeId, NodeKind, QueryTree};
use crate::ast::operators::ComparisonOp;
use crate::metadata::{FieldMetadata, FieldType};

/// Prune redundant terms from an already-expanded geospatial term
/// disjunction.
///
/// Tile hashes are hierarchical: a term on hash `abc` covers every record a
/// term on `abcd` would match. When an expansion over-covers the requested
/// region, the finer terms are provably not required, so within each
/// disjunction any equality term on a Geo-typed field whose hash extends
/// another kept term's hash by a proper prefix is removed. Returns a map
/// from field to the removed literal values for observability.
pub fn prune_geo_terms(
    tree: &mut QueryTree,
    metadata: &FieldMetadata,
) -> HashMap<String, Vec<String>> {
    let mut removed: HashMap<String, Vec<String>> = HashMap::new();
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();

    for id in ids {
        let NodeKind::Or(children) = tree.kind(id).clone() else {
            continue;
        };

        let mut hashes: Vec<(NodeId, Option<(String, String)>)> = Vec::new();
        for child in &children {
            hashes.push((*child, geo_term(tree, *child, metadata)));
        }

        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for (child, term) in &hashes {
            if let Some((field, hash)) = term {
                let covered = hashes.iter().any(|(other, other_term)| {
                    other != child
                        && matches!(
                            other_term,
                            Some((other_field, other_hash))
                                if other_field == field
                                    && hash.len() > other_hash.len()
                                    && hash.starts_with(other_hash.as_str())
                        )
                });
                if covered {
                    debug!(field = %field, hash = %hash, "pruning covered geo term");
                    removed.entry(field.clone()).or_default().push(hash.clone());
                    continue;
                }
            }
            kept.push(*child);
        }

        if kept.len() == children.len() {
            continue;
        }
        if kept.len() == 1 {
            let survivor = kept[0];
            match tree.parent(id) {
                Some(parent) => tree.replace_child(parent, id, survivor),
                None => tree.set_statement(survivor),
            }
        } else {
            tree.set_kind(id, NodeKind::Or(kept));
        }
    }

    removed
}

/// `(field, hash)` when the branch is `FIELD == 'hash'` on a Geo-typed
/// field.
fn geo_term(tree: &QueryTree, id: NodeId, metadata: &FieldMetadata) -> Option<(String, String)> {
    let inner = tree.unwrap_grouping(id);
    let NodeKind::Comparison {
        op: ComparisonOp::Eq,
        ..
    } = tree.kind(inner)
    else {
        return None;
    };
    let (field, literal) = tree.comparison_term(inner)?;
    if metadata.field_type(field) != Some(FieldType::Geo) {
        return None;
    }
    match literal {
        Literal::String(hash) => Some((field.to_string(), hash.clone())),
        _ => None,
    }
}
