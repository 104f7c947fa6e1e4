//! Stable string serialization of predicate trees.
//!
//! The printed form re-parses to a structurally equal tree, and crucially it
//! parenthesizes every compound child of a junction whether or not that
//! child is already reference-wrapped. Reference enforcement therefore never
//! changes the printed predicate.

use std::fmt;
use std::fmt::Write as _;

use crate::ast::node::{Literal, NodeId, NodeKind};
use crate::ast::tree::QueryTree;

impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(self.root()))
    }
}

impl QueryTree {
    /// Displayable view of the sub-tree rooted at `id`.
    pub fn display(&self, id: NodeId) -> DisplayNode<'_> {
        DisplayNode { tree: self, id }
    }
}

/// See [`QueryTree::display`].
pub struct DisplayNode<'a> {
    tree: &'a QueryTree,
    id: NodeId,
}

impl fmt::Display for DisplayNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self.tree, self.id, f)
    }
}

fn write_node(tree: &QueryTree, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match tree.kind(id) {
        NodeKind::Script(stmts) => {
            for (i, stmt) in stmts.iter().enumerate() {
                if i > 0 {
                    f.write_str("; ")?;
                }
                write_node(tree, *stmt, f)?;
            }
            Ok(())
        }
        NodeKind::And(children) => write_junction(tree, children, " && ", f),
        NodeKind::Or(children) => write_junction(tree, children, " || ", f),
        NodeKind::Not(child) => {
            f.write_str("!")?;
            write_unary_operand(tree, *child, f)
        }
        NodeKind::Negative(child) => {
            f.write_str("-")?;
            write_unary_operand(tree, *child, f)
        }
        NodeKind::Reference(child) => write_node(tree, *child, f),
        NodeKind::ReferenceExpr(child) => {
            f.write_str("(")?;
            write_node(tree, *child, f)?;
            f.write_str(")")
        }
        NodeKind::Comparison { op, left, right } => {
            write_node(tree, *left, f)?;
            write!(f, " {} ", op)?;
            write_node(tree, *right, f)
        }
        NodeKind::Identifier(name) => f.write_str(name),
        NodeKind::Literal(lit) => write_literal(lit, f),
        NodeKind::FunctionCall {
            namespace,
            name,
            args,
        } => {
            if let Some(ns) = namespace {
                write!(f, "{}:", ns)?;
            }
            write!(f, "{}(", name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_node(tree, *arg, f)?;
            }
            f.write_str(")")
        }
        NodeKind::Assignment { name, value } => {
            write!(f, "{} = ", name)?;
            write_node(tree, *value, f)
        }
        NodeKind::Marker { kind, source } => {
            // Printed in the wire encoding so the string re-parses and
            // re-decodes to the same marker.
            write!(f, "({} = true) && ", kind.label())?;
            write_junction_operand(tree, *source, f)
        }
    }
}

fn write_junction(
    tree: &QueryTree,
    children: &[NodeId],
    sep: &str,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_junction_operand(tree, *child, f)?;
    }
    Ok(())
}

/// A junction child prints in parentheses when it is a compound expression
/// that is not already wrapped; wrapped children carry their own parens.
fn write_junction_operand(tree: &QueryTree, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let kind = tree.kind(id);
    if !kind.is_grouping() && kind.is_compound() {
        f.write_str("(")?;
        write_node(tree, id, f)?;
        f.write_str(")")
    } else {
        write_node(tree, id, f)
    }
}

/// A `!`/`-` operand keeps only atoms and already-wrapped groups bare.
fn write_unary_operand(tree: &QueryTree, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match tree.kind(id) {
        NodeKind::Identifier(_)
        | NodeKind::Literal(_)
        | NodeKind::FunctionCall { .. }
        | NodeKind::Reference(_)
        | NodeKind::ReferenceExpr(_) => write_node(tree, id, f),
        _ => {
            f.write_str("(")?;
            write_node(tree, id, f)?;
            f.write_str(")")
        }
    }
}

fn write_literal(lit: &Literal, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match lit {
        Literal::Number(n) => write!(f, "{}", n),
        Literal::String(s) => {
            f.write_str("'")?;
            for ch in s.chars() {
                match ch {
                    '\'' => f.write_str("\\'")?,
                    '\\' => f.write_str("\\\\")?,
                    _ => f.write_char(ch)?,
                }
            }
            f.write_str("'")
        }
        Literal::Boolean(b) => write!(f, "{}", b),
        Literal::Null => f.write_str("null"),
    }
}
