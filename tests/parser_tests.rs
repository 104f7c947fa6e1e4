// tests/parser_tests.rs

use sieve_plan::ast::marker;
use sieve_plan::error::{ParseError, PlanError};
use sieve_plan::{parse_predicate, ComparisonOp, Literal, MarkerKind, NodeKind, QueryTree};

fn parsed(source: &str) -> QueryTree {
    parse_predicate(source).unwrap()
}

fn decoded(source: &str) -> QueryTree {
    let mut tree = parsed(source);
    marker::decode_markers(&mut tree).unwrap();
    tree
}

fn statement_kind(tree: &QueryTree) -> &NodeKind {
    tree.kind(tree.unwrap_grouping(tree.statement().unwrap()))
}

// ============================================================================
// Basic parsing
// ============================================================================

#[test]
fn test_comparison() {
    let tree = parsed("FOO == 'bar'");
    match statement_kind(&tree) {
        NodeKind::Comparison { op, left, right } => {
            assert_eq!(*op, ComparisonOp::Eq);
            assert_eq!(tree.identifier_at(*left), Some("FOO"));
            assert_eq!(
                tree.literal_at(*right),
                Some(&Literal::String("bar".to_string()))
            );
        }
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn test_all_comparison_operators() {
    let cases = [
        ("FOO == '1'", ComparisonOp::Eq),
        ("FOO != '1'", ComparisonOp::Ne),
        ("FOO < '1'", ComparisonOp::Lt),
        ("FOO > '1'", ComparisonOp::Gt),
        ("FOO <= '1'", ComparisonOp::Le),
        ("FOO >= '1'", ComparisonOp::Ge),
        ("FOO =~ '1.*'", ComparisonOp::Matches),
        ("FOO !~ '1.*'", ComparisonOp::NotMatches),
    ];
    for (source, expected) in cases {
        let tree = parsed(source);
        match statement_kind(&tree) {
            NodeKind::Comparison { op, .. } => assert_eq!(*op, expected, "{}", source),
            other => panic!("expected comparison for {}, got {:?}", source, other),
        }
    }
}

#[test]
fn test_precedence_and_binds_tighter_than_or() {
    let tree = parsed("A == '1' || B == '2' && C == '3'");
    let NodeKind::Or(children) = statement_kind(&tree) else {
        panic!("expected disjunction at the top");
    };
    assert_eq!(children.len(), 2);
    assert!(matches!(
        tree.kind(tree.unwrap_grouping(children[1])),
        NodeKind::And(inner) if inner.len() == 2
    ));
}

#[test]
fn test_nary_junction_collection() {
    let tree = parsed("A == '1' && B == '2' && C == '3'");
    let NodeKind::And(children) = statement_kind(&tree) else {
        panic!("expected conjunction at the top");
    };
    assert_eq!(children.len(), 3);
}

#[test]
fn test_parenthesized_group_is_reference_wrapped() {
    let tree = parsed("(A == '1' || B == '2') && C == '3'");
    let NodeKind::And(children) = statement_kind(&tree) else {
        panic!("expected conjunction at the top");
    };
    assert!(matches!(tree.kind(children[0]), NodeKind::Reference(_)));
    assert!(matches!(
        tree.kind(tree.unwrap_grouping(children[0])),
        NodeKind::Or(_)
    ));
}

#[test]
fn test_negation() {
    let tree = parsed("!(FOO == 'bar')");
    assert!(matches!(statement_kind(&tree), NodeKind::Not(_)));
}

#[test]
fn test_unary_minus() {
    let tree = parsed("FOO > -5");
    let NodeKind::Comparison { right, .. } = statement_kind(&tree) else {
        panic!("expected comparison");
    };
    assert!(matches!(tree.kind(*right), NodeKind::Negative(_)));
}

#[test]
fn test_function_call() {
    let tree = parsed("filter:includeRegex(FOO, 'ba.*')");
    match statement_kind(&tree) {
        NodeKind::FunctionCall {
            namespace,
            name,
            args,
        } => {
            assert_eq!(namespace.as_deref(), Some("filter"));
            assert_eq!(name, "includeRegex");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected function call, got {:?}", other),
    }
}

#[test]
fn test_bare_function_call() {
    let tree = parsed("isNotNull(FOO)");
    match statement_kind(&tree) {
        NodeKind::FunctionCall {
            namespace, name, ..
        } => {
            assert_eq!(*namespace, None);
            assert_eq!(name, "isNotNull");
        }
        other => panic!("expected function call, got {:?}", other),
    }
}

#[test]
fn test_assignment() {
    let tree = parsed("(_shardDayHint_ = '20240101')");
    match statement_kind(&tree) {
        NodeKind::Assignment { name, value } => {
            assert_eq!(name, "_shardDayHint_");
            assert_eq!(
                tree.literal_at(*value),
                Some(&Literal::String("20240101".to_string()))
            );
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_empty_input_is_empty_predicate() {
    let tree = parsed("");
    assert!(tree.is_empty_predicate());
    assert_eq!(tree.to_string(), "");
}

#[test]
fn test_trailing_semicolon_tolerated() {
    let tree = parsed("FOO == 'bar';");
    assert!(matches!(
        statement_kind(&tree),
        NodeKind::Comparison { .. }
    ));
}

// ============================================================================
// Parse errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let err = parse_predicate("FOO == 'bar").unwrap_err();
    assert!(matches!(err, ParseError::UnterminatedString { .. }));
}

#[test]
fn test_missing_operand() {
    let err = parse_predicate("FOO == ").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_unbalanced_parens() {
    let err = parse_predicate("(FOO == 'bar'").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_unexpected_character() {
    let err = parse_predicate("FOO == #").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedChar { ch: '#', .. }));
}

// ============================================================================
// Printing round-trips
// ============================================================================

#[test]
fn test_round_trip_preserves_source() {
    let sources = [
        "FOO == 'bar'",
        "FOO == 'bar' && TOO == 'baz'",
        "A == '1' || (B == '2' && C == '3')",
        "!(FOO == 'bar')",
        "FOO > -5",
        "filter:includeRegex(FOO, 'ba.*')",
        "f:noExpansion(FOO, BAR)",
        "(A == '1' || B == '2') && C == '3'",
        "FOO != null",
    ];
    for source in sources {
        assert_eq!(parsed(source).to_string(), source);
    }
}

#[test]
fn test_reprinted_form_reparses_to_same_string() {
    let printed = parsed("A == '1' || B == '2' && C == '3'").to_string();
    assert_eq!(parsed(&printed).to_string(), printed);
}

#[test]
fn test_string_escapes_round_trip() {
    let tree = parsed("FOO == 'it\\'s'");
    let NodeKind::Comparison { right, .. } = statement_kind(&tree) else {
        panic!("expected comparison");
    };
    assert_eq!(
        tree.literal_at(*right),
        Some(&Literal::String("it's".to_string()))
    );
    assert_eq!(tree.to_string(), "FOO == 'it\\'s'");
}

// ============================================================================
// Marker decoding
// ============================================================================

#[test]
fn test_decode_marker_conjunction() {
    let tree = decoded("((_Delayed_ = true) && FOO == 'bar')");
    match statement_kind(&tree) {
        NodeKind::Marker { kind, source } => {
            assert_eq!(*kind, MarkerKind::Delayed);
            assert!(matches!(
                tree.kind(tree.unwrap_grouping(*source)),
                NodeKind::Comparison { .. }
            ));
        }
        other => panic!("expected marker, got {:?}", other),
    }
}

#[test]
fn test_decode_every_marker_label() {
    for kind in MarkerKind::ALL {
        let source = format!("(({} = true) && FOO == 'bar')", kind.label());
        let tree = decoded(&source);
        assert!(
            matches!(statement_kind(&tree), NodeKind::Marker { kind: k, .. } if *k == kind),
            "{}",
            source
        );
    }
}

#[test]
fn test_decode_nested_markers() {
    let tree = decoded("((_Delayed_ = true) && ((_Bounded_ = true) && (FOO >= '1' && FOO <= '2')))");
    let NodeKind::Marker { kind, source } = statement_kind(&tree) else {
        panic!("expected outer marker");
    };
    assert_eq!(*kind, MarkerKind::Delayed);
    assert!(matches!(
        tree.kind(tree.unwrap_grouping(*source)),
        NodeKind::Marker {
            kind: MarkerKind::Bounded,
            ..
        }
    ));
}

#[test]
fn test_decoded_marker_prints_wire_form() {
    let source = "((_Bounded_ = true) && (FOO >= '1' && FOO <= '10'))";
    let tree = decoded(source);
    assert_eq!(tree.to_string(), source);
}

#[test]
fn test_marker_with_multiple_sources_is_fatal() {
    let mut tree = parsed("(_Bounded_ = true) && FOO >= '1' && FOO <= '10'");
    let err = marker::decode_markers(&mut tree).unwrap_err();
    match err {
        PlanError::MalformedQuery(detail) => {
            assert!(detail.contains("_Bounded_"), "{}", detail);
            assert!(detail.contains("found 2"), "{}", detail);
        }
        other => panic!("expected malformed-query error, got {:?}", other),
    }
}

#[test]
fn test_marker_with_no_source_is_fatal() {
    let mut tree = parsed("(_Delayed_ = true)");
    let err = marker::decode_markers(&mut tree).unwrap_err();
    match err {
        PlanError::MalformedQuery(detail) => {
            assert!(detail.contains("found 0"), "{}", detail);
        }
        other => panic!("expected malformed-query error, got {:?}", other),
    }
}

#[test]
fn test_shard_day_hint_is_not_a_marker() {
    let tree = decoded("FOO == 'bar' && (_shardDayHint_ = '20240101')");
    assert!(matches!(statement_kind(&tree), NodeKind::And(_)));
}

#[test]
fn test_find_all_reports_preorder() {
    let tree = decoded(
        "((_Delayed_ = true) && A == '1') || ((_Delayed_ = true) && B == '2')",
    );
    let found = marker::find_all(&tree, MarkerKind::Delayed);
    assert_eq!(found.len(), 2);
    let first = tree.unwrap_grouping(found[0].1);
    assert!(
        matches!(tree.comparison_term(first), Some(("A", _))),
        "pre-order puts the left disjunct first"
    );
}
