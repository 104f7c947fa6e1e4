use rust_decimal::Decimal;

use crate::ast::marker::MarkerKind;
use crate::ast::operators::ComparisonOp;

/// Handle to a node in a [`crate::ast::QueryTree`] arena.
///
/// Ids are only meaningful within the tree that allocated them. They are
/// cheap to copy and hash, which is what lets passes store child and parent
/// relationships as plain data instead of owning references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A literal value appearing on one side of a comparison, inside an
/// assignment, or as a function argument.
///
/// Numbers are [`Decimal`] so that `-3` collapses exactly and quoted
/// numeric strings promote without floating-point drift.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Decimal),
    String(String),
    Boolean(bool),
    Null,
}

impl Literal {
    /// Literal text as it participates in index lookups (unquoted).
    pub fn lexeme(&self) -> String {
        match self {
            Literal::Number(n) => n.to_string(),
            Literal::String(s) => s.clone(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Null => "null".to_string(),
        }
    }
}

/// The closed set of node kinds a predicate tree is built from.
///
/// Child links are [`NodeId`]s into the owning tree. Every pass matches
/// exhaustively on this enum, so adding a kind forces every pass to decide
/// how to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of a parsed predicate. Normally holds exactly one statement;
    /// cleanup passes may leave it empty (the empty predicate).
    Script(Vec<NodeId>),

    /// N-ary conjunction. Canonical form keeps these flattened: no `And`
    /// directly under another `And`.
    And(Vec<NodeId>),

    /// N-ary disjunction, flattened like [`NodeKind::And`].
    Or(Vec<NodeId>),

    /// Boolean negation (`!expr`).
    Not(NodeId),

    /// Unary arithmetic minus as produced by the parser for `-3`. The
    /// numeric-literal fixing pass collapses this into a signed
    /// [`Literal::Number`].
    Negative(NodeId),

    /// Transparent grouping wrapper, paired with [`NodeKind::ReferenceExpr`].
    Reference(NodeId),

    /// Parenthesized grouping. Prints as `( child )`; semantically
    /// transparent.
    ReferenceExpr(NodeId),

    /// Binary comparison, e.g. `FOO == 'bar'` or `BAR =~ 'b.*'`.
    Comparison {
        op: ComparisonOp,
        left: NodeId,
        right: NodeId,
    },

    /// A field reference.
    Identifier(String),

    /// A literal operand.
    Literal(Literal),

    /// Function call, e.g. `filter:includeRegex(FOO, 'ba.*')`.
    FunctionCall {
        namespace: Option<String>,
        name: String,
        args: Vec<NodeId>,
    },

    /// `name = literal`. Appears only inside the textual marker encoding
    /// and as planner hints such as `_shardDayHint_ = '20190101'`.
    Assignment { name: String, value: NodeId },

    /// Planner metadata attached to a sub-tree. Semantically transparent:
    /// the evaluated meaning of the marker is the meaning of `source`.
    Marker { kind: MarkerKind, source: NodeId },
}

impl NodeKind {
    /// Whether this kind is a junction (`And`/`Or`).
    pub fn is_junction(&self) -> bool {
        matches!(self, NodeKind::And(_) | NodeKind::Or(_))
    }

    /// Whether this kind is a transparent grouping wrapper.
    pub fn is_grouping(&self) -> bool {
        matches!(self, NodeKind::Reference(_) | NodeKind::ReferenceExpr(_))
    }

    /// Whether a child of this kind needs reference wrapping when it sits
    /// under a junction or a unary negation. Bare comparisons, identifiers,
    /// literals, and function calls print unambiguously and are exempt.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            NodeKind::And(_)
                | NodeKind::Or(_)
                | NodeKind::Not(_)
                | NodeKind::Assignment { .. }
                | NodeKind::Marker { .. }
        )
    }
}

/// A node: its kind plus the recorded parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}
