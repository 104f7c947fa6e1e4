/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equal (`==`)
    Eq,
    /// Not equal (`!=`)
    Ne,
    /// Less than (`<`)
    Lt,
    /// Greater than (`>`)
    Gt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than or equal (`>=`)
    Ge,
    /// Regex match (`=~`)
    Matches,
    /// Negated regex match (`!~`)
    NotMatches,
}

impl ComparisonOp {
    /// The operator obtained by swapping operands: `x OP y ⟺ y mirror(OP) x`.
    ///
    /// Order-insensitive operators mirror to themselves; the inequalities
    /// mirror to their mathematical inverse.
    pub fn mirror(self) -> ComparisonOp {
        match self {
            ComparisonOp::Eq => ComparisonOp::Eq,
            ComparisonOp::Ne => ComparisonOp::Ne,
            ComparisonOp::Lt => ComparisonOp::Gt,
            ComparisonOp::Gt => ComparisonOp::Lt,
            ComparisonOp::Le => ComparisonOp::Ge,
            ComparisonOp::Ge => ComparisonOp::Le,
            ComparisonOp::Matches => ComparisonOp::Matches,
            ComparisonOp::NotMatches => ComparisonOp::NotMatches,
        }
    }

    /// Whether swapping operands requires switching to [`Self::mirror`].
    pub fn is_order_sensitive(self) -> bool {
        matches!(
            self,
            ComparisonOp::Lt | ComparisonOp::Gt | ComparisonOp::Le | ComparisonOp::Ge
        )
    }

    /// Whether the operator is negated as written (`!=`, `!~`). A bare
    /// comparison with one of these at the root makes the whole predicate
    /// top-level negated.
    pub fn is_negative(self) -> bool {
        matches!(self, ComparisonOp::Ne | ComparisonOp::NotMatches)
    }

    /// Whether the operator is a lower range bound (`>`, `>=`).
    pub fn is_lower_bound(self) -> bool {
        matches!(self, ComparisonOp::Gt | ComparisonOp::Ge)
    }

    /// Whether the operator is an upper range bound (`<`, `<=`).
    pub fn is_upper_bound(self) -> bool {
        matches!(self, ComparisonOp::Lt | ComparisonOp::Le)
    }

    /// Whether the operator is a regex operator (`=~`, `!~`).
    pub fn is_pattern(self) -> bool {
        matches!(self, ComparisonOp::Matches | ComparisonOp::NotMatches)
    }

    /// Source-text symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
            ComparisonOp::Le => "<=",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Matches => "=~",
            ComparisonOp::NotMatches => "!~",
        }
    }
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
