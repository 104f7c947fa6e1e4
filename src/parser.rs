use std::mem;

use crate::ast::{Literal, NodeId, NodeKind, QueryTree};
use crate::ast::operators::ComparisonOp;
use crate::error::ParseError;
use crate::lexer::{Lexer, Token};

/// Recursive-descent parser for the predicate syntax.
///
/// Produces a raw [`QueryTree`]: junctions are built n-ary directly,
/// parenthesized expressions become `Reference(ReferenceExpr(..))` pairs,
/// and marker conjunctions are left in their wire encoding (conversion to
/// `Marker` nodes is a separate pass, [`crate::ast::marker::decode_markers`]).
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    tree: QueryTree,
}

/// Parse a predicate string into a raw tree.
///
/// Empty (or all-whitespace) input parses to the empty predicate.
pub fn parse_predicate(source: &str) -> Result<QueryTree, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            tree: QueryTree::empty(),
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&expected.describe()));
        }
        self.advance()
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            got: self.current_token.describe(),
            position: self.lexer.position(),
        }
    }

    pub fn parse(mut self) -> Result<QueryTree, ParseError> {
        if self.check(&Token::Eof) {
            return Ok(self.tree);
        }
        let statement = self.parse_or()?;
        // A trailing semicolon is tolerated; anything else is an error.
        if self.check(&Token::Semicolon) {
            self.advance()?;
        }
        self.expect(Token::Eof)?;
        self.tree.set_statement(statement);
        Ok(self.tree)
    }

    fn parse_or(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_and()?;
        if !self.check(&Token::Or) {
            return Ok(first);
        }
        let mut children = vec![first];
        while self.check(&Token::Or) {
            self.advance()?;
            children.push(self.parse_and()?);
        }
        Ok(self.tree.alloc(NodeKind::Or(children)))
    }

    fn parse_and(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_unary()?;
        if !self.check(&Token::And) {
            return Ok(first);
        }
        let mut children = vec![first];
        while self.check(&Token::And) {
            self.advance()?;
            children.push(self.parse_unary()?);
        }
        Ok(self.tree.alloc(NodeKind::And(children)))
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        if self.check(&Token::Not) {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(self.tree.alloc(NodeKind::Not(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_operand()?;

        if let Some(op) = match &self.current_token {
            Token::EqEq => Some(ComparisonOp::Eq),
            Token::NotEq => Some(ComparisonOp::Ne),
            Token::Lt => Some(ComparisonOp::Lt),
            Token::Gt => Some(ComparisonOp::Gt),
            Token::LtEq => Some(ComparisonOp::Le),
            Token::GtEq => Some(ComparisonOp::Ge),
            Token::Matches => Some(ComparisonOp::Matches),
            Token::NotMatches => Some(ComparisonOp::NotMatches),
            _ => None,
        } {
            self.advance()?;
            let right = self.parse_operand()?;
            return Ok(self.tree.alloc(NodeKind::Comparison { op, left, right }));
        }

        if self.check(&Token::Assign) {
            let NodeKind::Identifier(name) = self.tree.kind(left).clone() else {
                return Err(self.unexpected("identifier on the left of '='"));
            };
            self.advance()?;
            let value = self.parse_operand()?;
            return Ok(self.tree.alloc(NodeKind::Assignment { name, value }));
        }

        Ok(left)
    }

    fn parse_operand(&mut self) -> Result<NodeId, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(self.tree.wrap_grouped(inner))
            }
            Token::Minus => {
                self.advance()?;
                let operand = self.parse_operand()?;
                Ok(self.tree.alloc(NodeKind::Negative(operand)))
            }
            Token::Number(n) => {
                self.advance()?;
                Ok(self.tree.alloc(NodeKind::Literal(Literal::Number(n))))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(self.tree.alloc(NodeKind::Literal(Literal::String(s))))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(self.tree.alloc(NodeKind::Literal(Literal::Boolean(b))))
            }
            Token::Null => {
                self.advance()?;
                Ok(self.tree.alloc(NodeKind::Literal(Literal::Null)))
            }
            Token::Identifier(name) => {
                self.advance()?;
                self.parse_identifier_or_call(name)
            }
            token => {
                self.current_token = token;
                Err(self.unexpected("an operand"))
            }
        }
    }

    /// An identifier is a field reference unless followed by `:` (namespaced
    /// call) or `(` (bare call).
    fn parse_identifier_or_call(&mut self, name: String) -> Result<NodeId, ParseError> {
        if self.check(&Token::Colon) {
            self.advance()?;
            let func = match mem::replace(&mut self.current_token, Token::Eof) {
                Token::Identifier(func) => func,
                token => {
                    self.current_token = token;
                    return Err(self.unexpected("function name after ':'"));
                }
            };
            self.advance()?;
            return self.parse_call(Some(name), func);
        }
        if self.check(&Token::LParen) {
            return self.parse_call(None, name);
        }
        Ok(self.tree.alloc(NodeKind::Identifier(name)))
    }

    fn parse_call(
        &mut self,
        namespace: Option<String>,
        name: String,
    ) -> Result<NodeId, ParseError> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        while !self.check(&Token::RParen) {
            args.push(self.parse_operand()?);
            if !self.check(&Token::RParen) {
                self.expect(Token::Comma)?;
            }
        }
        self.expect(Token::RParen)?;
        Ok(self.tree.alloc(NodeKind::FunctionCall {
            namespace,
            name,
            args,
        }))
    }
}
