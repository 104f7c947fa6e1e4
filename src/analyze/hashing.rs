use std::hash::{DefaultHasher, Hash, Hasher};

use crate::ast::{Literal, NodeId, NodeKind, QueryTree};

/// Fingerprint a tree such that two trees hash equal iff they denote the
/// same predicate up to reordering of `And`/`Or` children at every level.
///
/// Junction children combine with wrapping addition, which is commutative,
/// and the sum is then mixed with the junction's own tag, so an `And` and
/// an `Or` over the same children still differ. Grouping wrappers are
/// transparent. Marker kind feeds the hash: a sub-tree and its
/// marker-wrapped form never hash equal (short of collision).
pub fn canonical_hash(tree: &QueryTree) -> u64 {
    node_hash(tree, tree.root())
}

/// Fingerprint of the sub-tree rooted at `id`.
pub fn canonical_hash_at(tree: &QueryTree, id: NodeId) -> u64 {
    node_hash(tree, id)
}

// Tags keep structurally different kinds apart even when their children
// agree.
const TAG_SCRIPT: u8 = 1;
const TAG_AND: u8 = 2;
const TAG_OR: u8 = 3;
const TAG_NOT: u8 = 4;
const TAG_NEGATIVE: u8 = 5;
const TAG_COMPARISON: u8 = 6;
const TAG_IDENTIFIER: u8 = 7;
const TAG_LITERAL: u8 = 8;
const TAG_FUNCTION: u8 = 9;
const TAG_ASSIGNMENT: u8 = 10;
const TAG_MARKER: u8 = 11;

fn node_hash(tree: &QueryTree, id: NodeId) -> u64 {
    let id = tree.unwrap_grouping(id);
    let mut hasher = DefaultHasher::new();
    match tree.kind(id) {
        NodeKind::Script(stmts) => {
            TAG_SCRIPT.hash(&mut hasher);
            for stmt in stmts {
                node_hash(tree, *stmt).hash(&mut hasher);
            }
        }
        NodeKind::And(children) => {
            TAG_AND.hash(&mut hasher);
            commutative(tree, children).hash(&mut hasher);
            children.len().hash(&mut hasher);
        }
        NodeKind::Or(children) => {
            TAG_OR.hash(&mut hasher);
            commutative(tree, children).hash(&mut hasher);
            children.len().hash(&mut hasher);
        }
        NodeKind::Not(child) => {
            TAG_NOT.hash(&mut hasher);
            node_hash(tree, *child).hash(&mut hasher);
        }
        NodeKind::Negative(child) => {
            TAG_NEGATIVE.hash(&mut hasher);
            node_hash(tree, *child).hash(&mut hasher);
        }
        NodeKind::Reference(child) | NodeKind::ReferenceExpr(child) => {
            return node_hash(tree, *child);
        }
        NodeKind::Comparison { op, left, right } => {
            TAG_COMPARISON.hash(&mut hasher);
            op.hash(&mut hasher);
            node_hash(tree, *left).hash(&mut hasher);
            node_hash(tree, *right).hash(&mut hasher);
        }
        NodeKind::Identifier(name) => {
            TAG_IDENTIFIER.hash(&mut hasher);
            name.hash(&mut hasher);
        }
        NodeKind::Literal(literal) => {
            TAG_LITERAL.hash(&mut hasher);
            literal_hash(literal, &mut hasher);
        }
        NodeKind::FunctionCall {
            namespace,
            name,
            args,
        } => {
            TAG_FUNCTION.hash(&mut hasher);
            namespace.hash(&mut hasher);
            name.hash(&mut hasher);
            for arg in args {
                node_hash(tree, *arg).hash(&mut hasher);
            }
        }
        NodeKind::Assignment { name, value } => {
            TAG_ASSIGNMENT.hash(&mut hasher);
            name.hash(&mut hasher);
            node_hash(tree, *value).hash(&mut hasher);
        }
        NodeKind::Marker { kind, source } => {
            TAG_MARKER.hash(&mut hasher);
            kind.hash(&mut hasher);
            node_hash(tree, *source).hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Order-insensitive combination of sibling hashes.
fn commutative(tree: &QueryTree, children: &[NodeId]) -> u64 {
    children
        .iter()
        .fold(0u64, |acc, c| acc.wrapping_add(node_hash(tree, *c)))
}

fn literal_hash(literal: &Literal, hasher: &mut DefaultHasher) {
    match literal {
        // Trailing zeros must not matter: 1.0 and 1.00 are the same value.
        Literal::Number(n) => {
            0u8.hash(hasher);
            n.normalize().hash(hasher);
        }
        Literal::String(s) => {
            1u8.hash(hasher);
            s.hash(hasher);
        }
        Literal::Boolean(b) => {
            2u8.hash(hasher);
            b.hash(hasher);
        }
        Literal::Null => 3u8.hash(hasher),
    }
}
