use std::collections::HashMap;

use regex::Regex;

use crate::ast::{Literal, NodeId, NodeKind, QueryTree};
use crate::error::PlanError;

/// Validation cache for regex patterns, scoped to one planning request.
///
/// An identical pattern string is compiled and validated once per cache,
/// no matter how many comparisons reuse it. Owned by the caller and passed
/// into [`collect_patterns`]; there is no process-global state.
#[derive(Debug, Default)]
pub struct PatternCache {
    validated: HashMap<String, Result<(), regex::Error>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct patterns validated so far.
    pub fn len(&self) -> usize {
        self.validated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validated.is_empty()
    }

    fn validate(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.validated
            .entry(pattern.to_string())
            .or_insert_with(|| Regex::new(pattern).map(|_| ()))
            .clone()
    }
}

/// Collect the field-to-patterns mapping for every regex comparison and
/// every `filter:includeRegex`/`filter:excludeRegex` argument in the tree.
///
/// Pattern syntax is checked here, at validation time, not at parse time;
/// the first invalid pattern fails the collection with a pattern-syntax
/// error naming the field it was attached to.
pub fn collect_patterns(
    tree: &QueryTree,
    cache: &mut PatternCache,
) -> Result<HashMap<String, Vec<String>>, PlanError> {
    let mut collected: HashMap<String, Vec<String>> = HashMap::new();

    for id in tree.preorder(tree.root()) {
        let Some((field, pattern)) = pattern_at(tree, id) else {
            continue;
        };
        cache
            .validate(&pattern)
            .map_err(|source| PlanError::PatternSyntax {
                field: field.clone(),
                pattern: pattern.clone(),
                source: Box::new(source),
            })?;
        collected.entry(field).or_default().push(pattern);
    }

    Ok(collected)
}

fn pattern_at(tree: &QueryTree, id: NodeId) -> Option<(String, String)> {
    match tree.kind(id) {
        NodeKind::Comparison { op, left, right } if op.is_pattern() => {
            let (field_side, pattern_side) =
                match (tree.identifier_at(*left), tree.identifier_at(*right)) {
                    (Some(_), None) => (*left, *right),
                    (None, Some(_)) => (*right, *left),
                    _ => return None,
                };
            let field = tree.identifier_at(field_side)?.to_string();
            match tree.literal_at(pattern_side)? {
                Literal::String(pattern) => Some((field, pattern.clone())),
                _ => None,
            }
        }
        NodeKind::FunctionCall {
            namespace,
            name,
            args,
        } => {
            let position = crate::functions::regex_argument(namespace.as_deref(), name)?;
            let field = tree.identifier_at(*args.first()?)?.to_string();
            match tree.literal_at(*args.get(position)?)? {
                Literal::String(pattern) => Some((field, pattern.clone())),
                _ => None,
            }
        }
        _ => None,
    }
}
