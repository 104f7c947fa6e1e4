// tests/rewrite_tests.rs

use std::collections::HashMap;

use sieve_plan::rewrite::{
    distribute_indexed_terms, extract_no_expansion, force_field_comparisons_to_evaluation,
    prune_geo_terms, remove_hints, rewrite_is_not_null_intent,
};
use sieve_plan::validate::validate_lineage;
use sieve_plan::{
    parse_predicate, ComparisonOp, FieldMetadata, FieldType, Literal, NodeId, NodeKind, QueryTree,
};

fn parsed(source: &str) -> QueryTree {
    parse_predicate(source).unwrap()
}

// ============================================================================
// Hint cleanup
// ============================================================================

#[test]
fn test_hint_removed_from_conjunction() {
    let mut tree = parsed("FOO == 'bar' && (_shardDayHint_ = '20240101')");
    remove_hints(&mut tree);
    assert_eq!(tree.to_string(), "FOO == 'bar'");
}

#[test]
fn test_hint_only_predicate_cleans_to_empty() {
    let mut tree = parsed("(_shardDayHint_ = '20240101')");
    remove_hints(&mut tree);
    assert!(tree.is_empty_predicate());
    assert_eq!(tree.to_string(), "");
}

#[test]
fn test_duplicate_hints_across_disjuncts() {
    let mut tree = parsed(
        "(FOO == 'a' && (_shardDayHint_ = 'x')) || (BAR == 'b' && (_shardDayHint_ = 'x'))",
    );
    remove_hints(&mut tree);
    assert_eq!(tree.to_string(), "FOO == 'a' || BAR == 'b'");
}

#[test]
fn test_hint_cleanup_is_a_fixpoint() {
    let mut tree = parsed("FOO == 'bar' && (_shardDayHint_ = 'x') && BAR == 'baz'");
    remove_hints(&mut tree);
    let once = tree.to_string();
    remove_hints(&mut tree);
    assert_eq!(tree.to_string(), once);
    assert_eq!(once, "FOO == 'bar' && BAR == 'baz'");
}

#[test]
fn test_other_assignments_survive_hint_cleanup() {
    let mut tree = parsed("FOO == 'bar' && (_other_ = 'x')");
    remove_hints(&mut tree);
    assert_eq!(tree.to_string(), "FOO == 'bar' && (_other_ = 'x')");
}

// ============================================================================
// Is-not-null intent
// ============================================================================

#[test]
fn test_universal_patterns_become_not_null() {
    for pattern in [".*", ".*?"] {
        let mut tree = parsed(&format!("FOO =~ '{}'", pattern));
        rewrite_is_not_null_intent(&mut tree);
        assert_eq!(tree.to_string(), "FOO != null", "pattern {}", pattern);
    }
}

#[test]
fn test_ordinary_pattern_untouched() {
    let mut tree = parsed("FOO =~ 'value.*'");
    rewrite_is_not_null_intent(&mut tree);
    assert_eq!(tree.to_string(), "FOO =~ 'value.*'");
}

#[test]
fn test_negative_pattern_untouched() {
    let mut tree = parsed("FOO !~ '.*'");
    rewrite_is_not_null_intent(&mut tree);
    assert_eq!(tree.to_string(), "FOO !~ '.*'");
}

#[test]
fn test_intent_rewrite_inside_junction() {
    let mut tree = parsed("FOO =~ '.*' && BAR == 'b'");
    rewrite_is_not_null_intent(&mut tree);
    assert_eq!(tree.to_string(), "FOO != null && BAR == 'b'");
}

// ============================================================================
// Field-to-field evaluation forcing
// ============================================================================

#[test]
fn test_field_to_field_comparison_gets_marked() {
    let mut tree = parsed("FOO == BAR");
    force_field_comparisons_to_evaluation(&mut tree);
    assert_eq!(tree.to_string(), "(_Eval_ = true) && FOO == BAR");
}

#[test]
fn test_field_to_literal_comparison_not_marked() {
    let mut tree = parsed("FOO == 'bar'");
    force_field_comparisons_to_evaluation(&mut tree);
    assert_eq!(tree.to_string(), "FOO == 'bar'");
}

#[test]
fn test_evaluation_forcing_is_idempotent() {
    let mut tree = parsed("FOO == BAR");
    force_field_comparisons_to_evaluation(&mut tree);
    let once = tree.to_string();
    force_field_comparisons_to_evaluation(&mut tree);
    assert_eq!(tree.to_string(), once);
}

#[test]
fn test_evaluation_forcing_inside_conjunction() {
    let mut tree = parsed("FOO == BAR && FOO == 'x'");
    force_field_comparisons_to_evaluation(&mut tree);
    assert_eq!(
        tree.to_string(),
        "((_Eval_ = true) && FOO == BAR) && FOO == 'x'"
    );
    validate_lineage(&tree, false).unwrap();
}

// ============================================================================
// Indexed-term distribution
// ============================================================================

fn city_metadata() -> FieldMetadata {
    FieldMetadata::new().with_indexed("CITY").with_indexed("STATE")
}

#[test]
fn test_distribute_indexed_term_over_disjunction() {
    let mut tree = parsed("CITY == 'london' && (CODE == 'ita' || STATE == 'missouri')");
    distribute_indexed_terms(&mut tree, &city_metadata());
    assert_eq!(
        tree.to_string(),
        "(STATE == 'missouri' && CITY == 'london') || (CODE == 'ita' && CITY == 'london')"
    );
    validate_lineage(&tree, false).unwrap();
}

#[test]
fn test_distribute_matches_either_child_order() {
    let mut tree = parsed("(CODE == 'ita' || STATE == 'missouri') && CITY == 'london'");
    distribute_indexed_terms(&mut tree, &city_metadata());
    assert_eq!(
        tree.to_string(),
        "(STATE == 'missouri' && CITY == 'london') || (CODE == 'ita' && CITY == 'london')"
    );
}

#[test]
fn test_no_distribution_when_all_branches_indexed() {
    let mut tree = parsed("CITY == 'london' && (STATE == 'missouri' || STATE == 'utah')");
    let before = tree.to_string();
    distribute_indexed_terms(&mut tree, &city_metadata());
    assert_eq!(tree.to_string(), before);
}

#[test]
fn test_no_distribution_when_several_branches_unindexed() {
    let mut tree = parsed("CITY == 'london' && (CODE == 'ita' || CODE == 'fra')");
    let before = tree.to_string();
    distribute_indexed_terms(&mut tree, &city_metadata());
    assert_eq!(tree.to_string(), before);
}

#[test]
fn test_no_distribution_for_wider_conjunction() {
    let mut tree =
        parsed("CITY == 'london' && STATE == 'utah' && (CODE == 'ita' || STATE == 'missouri')");
    let before = tree.to_string();
    distribute_indexed_terms(&mut tree, &city_metadata());
    assert_eq!(tree.to_string(), before);
}

// Truth-table evaluator over field-vs-literal equality comparisons, enough
// to check that distribution never changes the evaluated meaning.
fn truth(tree: &QueryTree, id: NodeId, record: &HashMap<&str, &str>) -> bool {
    let id = tree.unwrap_grouping(id);
    match tree.kind(id) {
        NodeKind::And(children) => children.iter().all(|c| truth(tree, *c, record)),
        NodeKind::Or(children) => children.iter().any(|c| truth(tree, *c, record)),
        NodeKind::Not(child) => !truth(tree, *child, record),
        NodeKind::Comparison { op, .. } => {
            let (field, literal) = tree.comparison_term(id).expect("field-vs-literal comparison");
            let holds = matches!(
                literal,
                Literal::String(s) if record.get(field).copied() == Some(s.as_str())
            );
            match op {
                ComparisonOp::Eq => holds,
                ComparisonOp::Ne => !holds,
                other => panic!("operator {} not supported by the truth evaluator", other),
            }
        }
        other => panic!("node {:?} not supported by the truth evaluator", other),
    }
}

#[test]
fn test_distribution_preserves_truth_tables() {
    let source = "CITY == 'london' && (CODE == 'ita' || STATE == 'missouri')";
    let original = parsed(source);
    let mut distributed = parsed(source);
    distribute_indexed_terms(&mut distributed, &city_metadata());
    assert_ne!(original.to_string(), distributed.to_string());

    for city in ["london", "paris"] {
        for code in ["ita", "fra"] {
            for state in ["missouri", "utah"] {
                let record = HashMap::from([("CITY", city), ("CODE", code), ("STATE", state)]);
                assert_eq!(
                    truth(&original, original.statement().unwrap(), &record),
                    truth(&distributed, distributed.statement().unwrap(), &record),
                    "diverged for {:?}",
                    record
                );
            }
        }
    }
}

// ============================================================================
// No-expansion directive extraction
// ============================================================================

#[test]
fn test_no_expansion_fields_extracted_and_call_removed() {
    let mut tree = parsed("FOO == 'bar' && f:noExpansion(BAR, BAZ)");
    let excluded = extract_no_expansion(&mut tree);
    assert_eq!(tree.to_string(), "FOO == 'bar'");
    assert!(excluded.contains("BAR"));
    assert!(excluded.contains("BAZ"));
    assert_eq!(excluded.len(), 2);
}

#[test]
fn test_directive_only_predicate_cleans_to_empty() {
    let mut tree = parsed("f:noExpansion(FOO)");
    let excluded = extract_no_expansion(&mut tree);
    assert!(tree.is_empty_predicate());
    assert!(excluded.contains("FOO"));
}

#[test]
fn test_no_directive_means_no_change() {
    let mut tree = parsed("FOO == 'bar'");
    let excluded = extract_no_expansion(&mut tree);
    assert!(excluded.is_empty());
    assert_eq!(tree.to_string(), "FOO == 'bar'");
}

#[test]
fn test_other_namespaces_are_not_directives() {
    let mut tree = parsed("filter:noExpansion(FOO)");
    let excluded = extract_no_expansion(&mut tree);
    assert!(excluded.is_empty());
    assert_eq!(tree.to_string(), "filter:noExpansion(FOO)");
}

// ============================================================================
// Geo term pruning
// ============================================================================

fn geo_metadata() -> FieldMetadata {
    FieldMetadata::new().with_type("TRACK", FieldType::Geo)
}

#[test]
fn test_covered_geo_term_pruned() {
    let mut tree = parsed("TRACK == '0123' || TRACK == '0123456' || TRACK == '9999'");
    let removed = prune_geo_terms(&mut tree, &geo_metadata());
    assert_eq!(tree.to_string(), "TRACK == '0123' || TRACK == '9999'");
    assert_eq!(removed.get("TRACK"), Some(&vec!["0123456".to_string()]));
}

#[test]
fn test_single_survivor_collapses_the_disjunction() {
    let mut tree = parsed("TRACK == '01' || TRACK == '0123'");
    prune_geo_terms(&mut tree, &geo_metadata());
    assert_eq!(tree.to_string(), "TRACK == '01'");
}

#[test]
fn test_identical_hashes_are_not_pruned() {
    let mut tree = parsed("TRACK == '0123' || TRACK == '0123'");
    let removed = prune_geo_terms(&mut tree, &geo_metadata());
    assert!(removed.is_empty());
    assert_eq!(tree.to_string(), "TRACK == '0123' || TRACK == '0123'");
}

#[test]
fn test_different_fields_never_cover_each_other() {
    let metadata = FieldMetadata::new()
        .with_type("TRACK", FieldType::Geo)
        .with_type("ROUTE", FieldType::Geo);
    let mut tree = parsed("TRACK == '01' || ROUTE == '0123'");
    let removed = prune_geo_terms(&mut tree, &metadata);
    assert!(removed.is_empty());
}

#[test]
fn test_non_geo_fields_untouched() {
    let mut tree = parsed("NAME == '01' || NAME == '0123'");
    let removed = prune_geo_terms(&mut tree, &geo_metadata());
    assert!(removed.is_empty());
    assert_eq!(tree.to_string(), "NAME == '01' || NAME == '0123'");
}
