//! The function surface the planner understands.
//!
//! Function calls are otherwise opaque to this layer; the handful below
//! participate in normalization and analysis and are recognized by
//! namespace and name.

/// Record-evaluation helpers: `filter:includeRegex(FIELD, 'pat')`,
/// `filter:isNull(FIELD)`, ...
pub const FILTER_NAMESPACE: &str = "filter";

/// Planner directives: `f:noExpansion(FIELD, ...)`.
pub const PLANNER_NAMESPACE: &str = "f";

/// Geospatial helpers: `geo:intersects(FIELD, 'wkt')`, ...
pub const GEO_NAMESPACE: &str = "geo";

/// Marks fields as excluded from future term expansion.
pub const NO_EXPANSION: &str = "noExpansion";

pub const INCLUDE_REGEX: &str = "includeRegex";
pub const EXCLUDE_REGEX: &str = "excludeRegex";

/// Argument positions that name a field (and therefore participate in case
/// normalization), for a call with `argc` arguments.
pub fn field_argument_positions(namespace: Option<&str>, name: &str, argc: usize) -> Vec<usize> {
    match (namespace, name) {
        (Some(PLANNER_NAMESPACE), NO_EXPANSION) => (0..argc).collect(),
        (Some(FILTER_NAMESPACE), _) | (Some(GEO_NAMESPACE), _) => {
            if argc > 0 {
                vec![0]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// The argument position holding a regex pattern, if this function carries
/// one.
pub fn regex_argument(namespace: Option<&str>, name: &str) -> Option<usize> {
    match (namespace, name) {
        (Some(FILTER_NAMESPACE), INCLUDE_REGEX) | (Some(FILTER_NAMESPACE), EXCLUDE_REGEX) => {
            Some(1)
        }
        _ => None,
    }
}

/// Whether a function can be evaluated against the record itself, without
/// any index lookup. Only the `filter` namespace qualifies; everything else
/// is conservatively unsatisfiable from local data.
pub fn is_record_evaluable(namespace: Option<&str>) -> bool {
    namespace == Some(FILTER_NAMESPACE)
}
