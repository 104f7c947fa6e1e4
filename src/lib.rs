pub mod analyze;
pub mod ast;
pub mod error;
pub mod functions;
pub mod lexer;
pub mod metadata;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod rewrite;
pub mod validate;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ComparisonOp, Literal, MarkerKind, NodeId, NodeKind, QueryTree};
pub use error::{ParseError, PlanError};
pub use lexer::{Lexer, Token};
pub use metadata::{FieldMetadata, FieldType, PlanConfig, SatisfactionSets};
pub use parser::{parse_predicate, Parser};
pub use pipeline::{NormalizedQuery, Planner};
