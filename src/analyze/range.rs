use crate::ast::{marker, Literal, MarkerKind, NodeId, NodeKind, QueryTree};
use crate::ast::operators::ComparisonOp;
use crate::error::PlanError;
use crate::metadata::PlanConfig;

/// A well-formed bounded range: one lower and one upper bound on a single
/// field, as wrapped by a `_Bounded_` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedRange {
    pub field: String,
    pub lower: (ComparisonOp, Literal),
    pub upper: (ComparisonOp, Literal),
}

/// Decode the bounded range behind a `_Bounded_` marker node.
///
/// The marker's source, after stripping grouping wrappers, must be exactly
/// a conjunction of two field-vs-literal inequality comparisons on the same
/// field, one lower bound (`>`/`>=`) and one upper bound (`<`/`<=`), in
/// either order. Anything else is a fatal malformed-query condition, never
/// silently repaired.
pub fn bounded_range(tree: &QueryTree, marker_id: NodeId) -> Result<BoundedRange, PlanError> {
    let Some((MarkerKind::Bounded, source)) = marker::unwrap(tree, marker_id) else {
        return Err(PlanError::MalformedQuery(
            "bounded range requested on a node that is not a _Bounded_ marker".to_string(),
        ));
    };
    let malformed = |detail: &str| {
        PlanError::MalformedQuery(format!(
            "_Bounded_ marker must wrap a two-sided range on one field: {}",
            detail
        ))
    };

    let NodeKind::And(children) = tree.kind(source) else {
        return Err(malformed("source is not a conjunction"));
    };
    if children.len() != 2 {
        return Err(malformed("expected exactly two bound comparisons"));
    }

    let mut lower = None;
    let mut upper = None;
    let mut field: Option<String> = None;
    for child in children {
        let inner = tree.unwrap_grouping(*child);
        let NodeKind::Comparison { op, .. } = tree.kind(inner) else {
            return Err(malformed("bound is not a comparison"));
        };
        let Some((bound_field, literal)) = tree.comparison_term(inner) else {
            return Err(malformed("bound is not a field-to-literal comparison"));
        };
        match &field {
            None => field = Some(bound_field.to_string()),
            Some(prior) if prior != bound_field => {
                return Err(malformed("bounds reference different fields"));
            }
            Some(_) => {}
        }
        if op.is_lower_bound() && lower.is_none() {
            lower = Some((*op, literal.clone()));
        } else if op.is_upper_bound() && upper.is_none() {
            upper = Some((*op, literal.clone()));
        } else {
            return Err(malformed(&format!("unexpected bound operator '{}'", op)));
        }
    }

    match (field, lower, upper) {
        (Some(field), Some(lower), Some(upper)) => Ok(BoundedRange {
            field,
            lower,
            upper,
        }),
        _ => Err(malformed("missing a lower or upper bound")),
    }
}

/// Whether the range must be expanded into a literal term enumeration.
///
/// A range scan only works when every datatype the query declares for the
/// field keeps index keys in range order; a text (or undeclared) field
/// does not, so its ranges expand into discrete terms.
pub fn range_must_expand(range: &BoundedRange, config: &PlanConfig) -> bool {
    match config.declared_types(&range.field) {
        Some(types) if !types.is_empty() => !types.iter().all(|ty| ty.is_range_scannable()),
        _ => true,
    }
}

/// All bounded ranges in the tree, in pre-order, failing on the first
/// malformed one.
pub fn detect_bounded_ranges(tree: &QueryTree) -> Result<Vec<(NodeId, BoundedRange)>, PlanError> {
    marker::find_all(tree, MarkerKind::Bounded)
        .into_iter()
        .map(|(marker_id, _)| Ok((marker_id, bounded_range(tree, marker_id)?)))
        .collect()
}
