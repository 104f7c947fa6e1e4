use crate::ast::{NodeId, NodeKind, QueryTree};
use crate::functions;
use crate::metadata::FieldMetadata;

/// Upper-case every identifier that denotes a known field.
///
/// Field positions are the operands of comparisons and the designated
/// field-name argument positions of planner-known functions. String-literal
/// arguments are never touched, even in field positions: `filter:includeRegex(foo, 'bar.*')`
/// upper-cases `foo` but leaves `'bar.*'` alone. Identifiers that do not
/// resolve to a field the metadata knows keep their spelling.
pub fn normalize_field_case(tree: &mut QueryTree, metadata: &FieldMetadata) {
    let ids: Vec<NodeId> = tree.preorder(tree.root()).collect();
    for id in ids {
        match tree.kind(id).clone() {
            NodeKind::Comparison { left, right, .. } => {
                uppercase_if_known(tree, left, metadata);
                uppercase_if_known(tree, right, metadata);
            }
            NodeKind::FunctionCall {
                namespace,
                name,
                args,
            } => {
                for position in
                    functions::field_argument_positions(namespace.as_deref(), &name, args.len())
                {
                    uppercase_if_known(tree, args[position], metadata);
                }
            }
            _ => {}
        }
    }
}

fn uppercase_if_known(tree: &mut QueryTree, operand: NodeId, metadata: &FieldMetadata) {
    let target = tree.unwrap_grouping(operand);
    let NodeKind::Identifier(name) = tree.kind(target) else {
        return;
    };
    let upper = name.to_uppercase();
    if upper != *name && metadata.knows(&upper) {
        tree.set_kind(target, NodeKind::Identifier(upper));
    }
}
