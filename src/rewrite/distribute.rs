use tracing::debug;

use crate::ast::{NodeId, NodeKind, QueryTree};
use crate::metadata::FieldMetadata;

/// Push an indexed conjunct into a disjunction so the result executes as a
/// union of index range scans.
///
/// For `A && (B || C)` where `A` is a term on an indexed field and exactly
/// one of the disjunction branches is unindexed, the distributive law gives
/// `(B && A) || (C && A)`: every branch of the output carries the shared
/// indexed term and the one unindexed branch no longer poisons the whole
/// conjunction. Indexed branches come first in the output. Structures that
/// do not match are left unchanged.
pub fn distribute_indexed_terms(tree: &mut QueryTree, metadata: &FieldMetadata) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();
    for id in ids {
        let NodeKind::And(children) = tree.kind(id).clone() else {
            continue;
        };
        if children.len() != 2 {
            continue;
        }
        let Some((shared, branches)) = match_distribution(tree, &children, metadata) else {
            continue;
        };

        debug!(
            shared = %tree.display(shared),
            branches = branches.len(),
            "distributing indexed term over disjunction"
        );

        // Indexed branches first, the unindexed one last.
        let (indexed, unindexed): (Vec<NodeId>, Vec<NodeId>) = branches
            .into_iter()
            .partition(|b| branch_is_indexed(tree, *b, metadata));

        let mut conjunctions = Vec::new();
        for branch in indexed.into_iter().chain(unindexed) {
            let branch = tree.unwrap_grouping(branch);
            let shared_copy = tree.copy_subtree(shared);
            let conjunction = tree.alloc(NodeKind::And(vec![branch, shared_copy]));
            conjunctions.push(tree.wrap_grouped(conjunction));
        }
        tree.set_kind(id, NodeKind::Or(conjunctions));
    }
}

/// Match `And(term-on-indexed-field, Or(..))` in either child order, where
/// exactly one disjunction branch is unindexed. Returns the shared term
/// (unwrapped) and the disjunction branches.
fn match_distribution(
    tree: &QueryTree,
    children: &[NodeId],
    metadata: &FieldMetadata,
) -> Option<(NodeId, Vec<NodeId>)> {
    let (term, junction) = match (
        indexed_term(tree, children[0], metadata),
        indexed_term(tree, children[1], metadata),
    ) {
        (Some(term), None) => (term, children[1]),
        (None, Some(term)) => (term, children[0]),
        _ => return None,
    };
    let NodeKind::Or(branches) = tree.kind(tree.unwrap_grouping(junction)) else {
        return None;
    };
    let unindexed = branches
        .iter()
        .filter(|b| !branch_is_indexed(tree, **b, metadata))
        .count();
    if unindexed != 1 {
        return None;
    }
    Some((term, branches.clone()))
}

/// The node itself when it is a field-vs-literal comparison on an indexed
/// field.
fn indexed_term(tree: &QueryTree, id: NodeId, metadata: &FieldMetadata) -> Option<NodeId> {
    let inner = tree.unwrap_grouping(id);
    let (field, _) = tree.comparison_term(inner)?;
    metadata.is_indexed(field).then_some(inner)
}

fn branch_is_indexed(tree: &QueryTree, id: NodeId, metadata: &FieldMetadata) -> bool {
    indexed_term(tree, id, metadata).is_some()
}
