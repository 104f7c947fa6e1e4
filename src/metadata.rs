//! Read-only collaborator inputs to the planning passes.
//!
//! Field metadata comes from the index's metadata service and the plan
//! configuration from the submitted request. Both are immutable for the
//! duration of a pipeline invocation and safe to share across concurrent
//! invocations.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Logical datatype of a field as the index stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Lexicographically indexed text.
    Text,
    /// Numerically normalized values.
    Number,
    /// Date/time values, normalized to a sortable encoding.
    Date,
    /// Geospatial tile hashes.
    Geo,
}

impl FieldType {
    /// Whether a bounded range over this type can execute directly as an
    /// index range scan without term expansion.
    pub fn is_range_scannable(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Date)
    }
}

/// What the metadata service knows about the fields of a query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Fields whose values are available via direct index lookup.
    #[serde(default)]
    pub indexed: HashSet<String>,
    /// Fields indexed through tokenization (term-frequency fields).
    #[serde(default)]
    pub tokenized: HashSet<String>,
    /// Per-field logical datatype.
    #[serde(default)]
    pub types: HashMap<String, FieldType>,
}

impl FieldMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indexed(mut self, field: &str) -> Self {
        self.indexed.insert(field.to_string());
        self
    }

    pub fn with_tokenized(mut self, field: &str) -> Self {
        self.tokenized.insert(field.to_string());
        self
    }

    pub fn with_type(mut self, field: &str, ty: FieldType) -> Self {
        self.types.insert(field.to_string(), ty);
        self
    }

    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexed.contains(field)
    }

    pub fn is_tokenized(&self, field: &str) -> bool {
        self.tokenized.contains(field)
    }

    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.types.get(field).copied()
    }

    /// Whether the field's index stores values as text. Quoted numeric
    /// literals against such fields must keep their quotes, otherwise the
    /// index lookup key would change. Geo fields qualify: tile hashes are
    /// digit strings stored under text keys.
    pub fn is_string_indexed(&self, field: &str) -> bool {
        matches!(
            self.field_type(field),
            Some(FieldType::Text) | Some(FieldType::Geo)
        ) || self.is_tokenized(field)
    }

    /// The set of field names this metadata knows at all, uppercased form.
    /// Case normalization only touches identifiers that resolve into this
    /// set.
    pub fn knows(&self, upper: &str) -> bool {
        self.indexed.contains(upper)
            || self.tokenized.contains(upper)
            || self.types.contains_key(upper)
    }
}

/// Per-request planning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// The query's declared field-to-datatype multimap. A field may carry
    /// several datatypes when the underlying records disagree.
    #[serde(default)]
    pub declared_types: HashMap<String, BTreeSet<FieldType>>,
    /// Maximum size of an in-memory term list before the planner must fall
    /// back to a disk-backed strategy.
    #[serde(default = "default_term_threshold")]
    pub term_threshold: usize,
    /// Maximum number of values a single term may expand to in memory.
    #[serde(default = "default_value_threshold")]
    pub value_threshold: usize,
    /// Hard cap on the number of leaf terms a range may be built from.
    /// Exceeding it rejects the operation outright.
    #[serde(default = "default_max_range_terms")]
    pub max_range_terms: usize,
}

fn default_term_threshold() -> usize {
    2500
}

fn default_value_threshold() -> usize {
    5000
}

fn default_max_range_terms() -> usize {
    1000
}

impl Default for PlanConfig {
    fn default() -> Self {
        PlanConfig {
            declared_types: HashMap::new(),
            term_threshold: default_term_threshold(),
            value_threshold: default_value_threshold(),
            max_range_terms: default_max_range_terms(),
        }
    }
}

impl PlanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_declared_type(mut self, field: &str, ty: FieldType) -> Self {
        self.declared_types
            .entry(field.to_string())
            .or_default()
            .insert(ty);
        self
    }

    pub fn declared_types(&self, field: &str) -> Option<&BTreeSet<FieldType>> {
        self.declared_types.get(field)
    }
}

/// Field sets driving the satisfaction check: which fields are available
/// without further index lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SatisfactionSets {
    /// Fields that exist only in the index, never on the record itself.
    #[serde(default)]
    pub index_only: HashSet<String>,
    /// Fields explicitly forced to count as locally available. Overrides
    /// `index_only`.
    #[serde(default)]
    pub includable: HashSet<String>,
    /// Fields explicitly forced to count as unavailable.
    #[serde(default)]
    pub excludable: HashSet<String>,
}

impl SatisfactionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_only(mut self, field: &str) -> Self {
        self.index_only.insert(field.to_string());
        self
    }

    pub fn with_includable(mut self, field: &str) -> Self {
        self.includable.insert(field.to_string());
        self
    }

    pub fn with_excludable(mut self, field: &str) -> Self {
        self.excludable.insert(field.to_string());
        self
    }

    /// Whether a comparison against `field` can be answered from locally
    /// available data.
    pub fn is_available(&self, field: &str) -> bool {
        if self.includable.contains(field) {
            return true;
        }
        !self.index_only.contains(field) && !self.excludable.contains(field)
    }
}
