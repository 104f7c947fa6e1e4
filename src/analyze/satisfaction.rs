use crate::ast::{MarkerKind, NodeId, NodeKind, QueryTree};
use crate::functions;
use crate::metadata::SatisfactionSets;

/// Whether the predicate's truth value can be computed entirely from
/// already-available field values, without further index lookups.
///
/// Verdicts follow each junction's own boolean semantics: a conjunction is
/// satisfied when all of its children are, a disjunction when any child is.
/// Marker-wrapped range and list sub-trees count as satisfied as a unit
/// (the planner materializes them before evaluation); delayed and
/// evaluation-only markers are transparent. Field-to-field comparisons and
/// non-`filter` functions are conservatively unsatisfied. The empty
/// predicate is trivially satisfied.
pub fn is_satisfied(tree: &QueryTree, sets: &SatisfactionSets) -> bool {
    match tree.statement() {
        Some(statement) => verdict(tree, statement, sets),
        None => true,
    }
}

fn verdict(tree: &QueryTree, id: NodeId, sets: &SatisfactionSets) -> bool {
    let id = tree.unwrap_grouping(id);
    match tree.kind(id) {
        NodeKind::Script(stmts) => stmts.iter().all(|s| verdict(tree, *s, sets)),
        NodeKind::And(children) => children.iter().all(|c| verdict(tree, *c, sets)),
        NodeKind::Or(children) => children.iter().any(|c| verdict(tree, *c, sets)),
        NodeKind::Not(child) | NodeKind::Negative(child) => verdict(tree, *child, sets),
        NodeKind::Reference(child) | NodeKind::ReferenceExpr(child) => verdict(tree, *child, sets),
        NodeKind::Marker { kind, source } => match kind {
            // Expanded ranges and materialized lists are handed to the
            // evaluator whole.
            MarkerKind::Bounded
            | MarkerKind::ExceededOr
            | MarkerKind::ExceededTerm
            | MarkerKind::ExceededValue => true,
            MarkerKind::Delayed | MarkerKind::EvaluationOnly => verdict(tree, *source, sets),
        },
        NodeKind::Comparison { left, right, .. } => {
            match (tree.identifier_at(*left), tree.identifier_at(*right)) {
                // Field-to-field comparisons need the whole record.
                (Some(_), Some(_)) => false,
                (Some(field), None) | (None, Some(field)) => sets.is_available(field),
                // Constant comparison; nothing to look up.
                (None, None) => true,
            }
        }
        NodeKind::FunctionCall {
            namespace, args, ..
        } => {
            functions::is_record_evaluable(namespace.as_deref())
                && args.iter().all(|arg| match tree.identifier_at(*arg) {
                    Some(field) => sets.is_available(field),
                    None => true,
                })
        }
        NodeKind::Identifier(field) => sets.is_available(field),
        NodeKind::Literal(_) | NodeKind::Assignment { .. } => true,
    }
}
