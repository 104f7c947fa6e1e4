use crate::ast::{Literal, NodeId, NodeKind, QueryTree};
use crate::metadata::FieldMetadata;

/// Fix up numeric literals in two steps.
///
/// 1. Collapse `Negative(Number(n))` sub-trees, as the parser produces for
///    `-3`, into a single signed numeric literal.
/// 2. Promote quoted strings that lexically look numeric (`FOO == '22'`)
///    into true numeric literals, unless the field is indexed as a string
///    type. A string-typed index stores `'22'` under the text key, so
///    dropping the quotes there would change the lookup.
///
/// Regex comparisons are never promoted: their right side is a pattern, not
/// a value.
pub fn fix_numeric_literals(tree: &mut QueryTree, metadata: &FieldMetadata) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();

    for id in &ids {
        collapse_signed(tree, *id);
    }

    for id in ids {
        let NodeKind::Comparison { op, left, right } = tree.kind(id).clone() else {
            continue;
        };
        if op.is_pattern() {
            continue;
        }
        let (field_side, literal_side) =
            match (tree.identifier_at(left), tree.identifier_at(right)) {
                (Some(_), None) => (left, right),
                (None, Some(_)) => (right, left),
                _ => continue,
            };
        let Some(field) = tree.identifier_at(field_side) else {
            continue;
        };
        if metadata.is_string_indexed(field) {
            continue;
        }
        let target = tree.unwrap_grouping(literal_side);
        let NodeKind::Literal(Literal::String(text)) = tree.kind(target) else {
            continue;
        };
        if let Ok(number) = text.parse::<rust_decimal::Decimal>() {
            tree.set_kind(target, NodeKind::Literal(Literal::Number(number)));
        }
    }
}

fn collapse_signed(tree: &mut QueryTree, id: NodeId) {
    let NodeKind::Negative(child) = tree.kind(id) else {
        return;
    };
    let target = tree.unwrap_grouping(*child);
    if let NodeKind::Literal(Literal::Number(n)) = tree.kind(target) {
        let signed = NodeKind::Literal(Literal::Number(-*n));
        tree.set_kind(id, signed);
    }
}
