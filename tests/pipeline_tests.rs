// tests/pipeline_tests.rs

use sieve_plan::analyze::{
    canonical_hash, detect_bounded_ranges, is_satisfied, range_must_expand,
    requires_disk_backed_evaluation,
};
use sieve_plan::error::PlanError;
use sieve_plan::validate::{enforce_term_limit, validate_lineage, validate_markers};
use sieve_plan::{
    parse_predicate, FieldMetadata, FieldType, PlanConfig, Planner, SatisfactionSets,
};

fn planner() -> Planner {
    Planner::new(FieldMetadata::new(), PlanConfig::new())
}

fn planner_with(metadata: FieldMetadata) -> Planner {
    Planner::new(metadata, PlanConfig::new())
}

// ============================================================================
// End-to-end normalization
// ============================================================================

#[test]
fn test_case_and_shape_normalization() {
    let metadata = FieldMetadata::new()
        .with_type("FOO", FieldType::Text)
        .with_type("TOO", FieldType::Text);
    let normalized = planner_with(metadata).plan("foo == 'bar' && too == 'baz'").unwrap();
    assert_eq!(normalized.tree.to_string(), "FOO == 'bar' && TOO == 'baz'");
    validate_lineage(&normalized.tree, true).unwrap();
}

#[test]
fn test_hint_stripped_during_planning() {
    let normalized = planner()
        .plan("FOO == 'bar' && (_shardDayHint_ = '20240101')")
        .unwrap();
    assert_eq!(normalized.tree.to_string(), "FOO == 'bar'");
}

#[test]
fn test_hint_only_query_plans_to_empty() {
    let normalized = planner().plan("(_shardDayHint_ = '20240101')").unwrap();
    assert!(normalized.tree.is_empty_predicate());
    assert!(is_satisfied(&normalized.tree, &SatisfactionSets::new()));
}

#[test]
fn test_indexed_term_distributed_during_planning() {
    let metadata = FieldMetadata::new().with_indexed("CITY").with_indexed("STATE");
    let normalized = planner_with(metadata)
        .plan("CITY == 'london' && (CODE == 'ita' || STATE == 'missouri')")
        .unwrap();
    assert_eq!(
        normalized.tree.to_string(),
        "(STATE == 'missouri' && CITY == 'london') || (CODE == 'ita' && CITY == 'london')"
    );
    validate_lineage(&normalized.tree, true).unwrap();
}

#[test]
fn test_signed_literal_on_the_left_becomes_field_first() {
    // The signed literal collapses before operand order runs, so the
    // swap still sees a literal on the left.
    let normalized = planner().plan("-3 < FOO").unwrap();
    assert_eq!(normalized.tree.to_string(), "FOO > -3");
}

#[test]
fn test_quoted_numeric_on_the_left_promotes_and_swaps() {
    let normalized = planner().plan("'10' > FOO").unwrap();
    assert_eq!(normalized.tree.to_string(), "FOO < 10");
}

#[test]
fn test_universal_regex_becomes_not_null() {
    let normalized = planner().plan("FOO =~ '.*?'").unwrap();
    assert_eq!(normalized.tree.to_string(), "FOO != null");
}

#[test]
fn test_bounded_range_survives_planning() {
    let metadata = FieldMetadata::new().with_type("FOO", FieldType::Text);
    let normalized = planner_with(metadata)
        .plan("((_Bounded_ = true) && (FOO >= '1' && FOO <= '10'))")
        .unwrap();

    let ranges = detect_bounded_ranges(&normalized.tree).unwrap();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].1.field, "FOO");
    assert!(range_must_expand(&ranges[0].1, &PlanConfig::new()));
    validate_lineage(&normalized.tree, true).unwrap();
}

#[test]
fn test_no_expansion_directive_reported() {
    let normalized = planner().plan("FOO == 'bar' && f:noExpansion(BAR)").unwrap();
    assert_eq!(normalized.tree.to_string(), "FOO == 'bar'");
    assert!(normalized.no_expansion_fields.contains("BAR"));
}

#[test]
fn test_pruned_geo_terms_reported() {
    let metadata = FieldMetadata::new().with_type("TRACK", FieldType::Geo);
    let normalized = planner_with(metadata)
        .plan("TRACK == '0123' || TRACK == '01234'")
        .unwrap();
    assert_eq!(normalized.tree.to_string(), "TRACK == '0123'");
    assert_eq!(
        normalized.pruned_geo_terms.get("TRACK"),
        Some(&vec!["01234".to_string()])
    );
}

#[test]
fn test_field_to_field_comparison_marked_during_planning() {
    let normalized = planner().plan("FOO == BAR").unwrap();
    assert_eq!(normalized.tree.to_string(), "(_Eval_ = true) && FOO == BAR");
    assert!(!is_satisfied(&normalized.tree, &SatisfactionSets::new()));
}

#[test]
fn test_disk_backed_strategy_detected_after_planning() {
    let normalized = planner()
        .plan("((_Term_ = true) && (A == '1' || B == '2'))")
        .unwrap();
    assert!(requires_disk_backed_evaluation(&normalized.tree));

    let sets = SatisfactionSets::new().with_index_only("A");
    assert!(is_satisfied(&normalized.tree, &sets));
}

#[test]
fn test_empty_query_plans_to_empty() {
    let normalized = planner().plan("").unwrap();
    assert!(normalized.tree.is_empty_predicate());
    assert_eq!(normalized.tree.to_string(), "");
}

// ============================================================================
// Fatal conditions
// ============================================================================

#[test]
fn test_parse_error_propagates() {
    let err = planner().plan("FOO == ").unwrap_err();
    assert!(matches!(err, PlanError::Parse(_)));
}

#[test]
fn test_malformed_marker_fails_the_plan() {
    let err = planner()
        .plan("(_Bounded_ = true) && FOO >= '1' && FOO <= '10'")
        .unwrap_err();
    assert!(matches!(err, PlanError::MalformedQuery(_)));
}

#[test]
fn test_term_limit_rejects_oversized_disjunction() {
    let tree = parse_predicate("A == '1' || B == '2' || C == '3'").unwrap();
    let disjunction = tree.statement().unwrap();

    let err = enforce_term_limit(&tree, disjunction, 2).unwrap_err();
    assert!(matches!(
        err,
        PlanError::TermLimitExceeded { count: 3, limit: 2 }
    ));

    assert_eq!(enforce_term_limit(&tree, disjunction, 5).unwrap(), 3);
}

#[test]
fn test_marker_validation_flags_raw_trees() {
    let well_formed = parse_predicate("((_Delayed_ = true) && FOO == 'bar')").unwrap();
    validate_markers(&well_formed).unwrap();

    let malformed = parse_predicate("(_Delayed_ = true) && A == '1' && B == '2'").unwrap();
    assert!(validate_markers(&malformed).is_err());
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn test_planning_is_idempotent() {
    let metadata = FieldMetadata::new().with_indexed("CITY").with_indexed("STATE");
    let planner = planner_with(metadata);

    let once = planner
        .plan("CITY == 'london' && (CODE == 'ita' || STATE == 'missouri')")
        .unwrap();
    let twice = planner.plan_tree(once.tree.clone()).unwrap();

    assert_eq!(once.tree.to_string(), twice.tree.to_string());
    assert_eq!(canonical_hash(&once.tree), canonical_hash(&twice.tree));
}

#[test]
fn test_printed_plan_reparses_to_the_same_plan() {
    let metadata = FieldMetadata::new().with_indexed("CITY").with_indexed("STATE");
    let planner = planner_with(metadata);

    let first = planner
        .plan("CITY == 'london' && (CODE == 'ita' || STATE == 'missouri')")
        .unwrap();
    let second = planner.plan(&first.tree.to_string()).unwrap();

    assert_eq!(first.tree.to_string(), second.tree.to_string());
    assert_eq!(canonical_hash(&first.tree), canonical_hash(&second.tree));
}

#[test]
fn test_equivalent_queries_share_a_fingerprint() {
    let planner = planner();
    let a = planner.plan("FOO == 'abc' || BAR == 'def'").unwrap();
    let b = planner.plan("BAR == 'def' || FOO == 'abc'").unwrap();
    assert_eq!(canonical_hash(&a.tree), canonical_hash(&b.tree));
}
