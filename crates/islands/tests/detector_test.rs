// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end detector behavior over realistic R fixtures.

use r_sql_islands::{Classification, DetectorConfig, Position, SqlIslandDetector};
use r_sql_islands_test_utils::{fixtures, position_of};

const KEY: &str = "file:///script.R";

fn classify_at(text: &str, needle: &str) -> Classification {
    let mut detector = SqlIslandDetector::default();
    let (line, character) = position_of(text, needle);
    detector.classify(KEY, 1, text, Position::new(line, character))
}

#[test]
fn simple_query_is_embedded_sql() {
    match classify_at(fixtures::SIMPLE_QUERY, "FROM users") {
        Classification::EmbeddedSql { region, .. } => {
            assert_eq!(region.call_name, "dbGetQuery");
            assert_eq!(region.raw_text, "SELECT id, name FROM users");
        }
        other => panic!("expected EmbeddedSql, got {other:?}"),
    }
}

#[test]
fn multiline_call_is_embedded_sql() {
    match classify_at(fixtures::MULTILINE_CALL, "SELECT id") {
        Classification::EmbeddedSql { region, .. } => {
            assert_eq!(region.call_name, "dbGetQuery");
            assert!(region.is_multiline);
        }
        other => panic!("expected EmbeddedSql, got {other:?}"),
    }
}

#[test]
fn glue_interpolation_defers_to_host() {
    assert!(classify_at(fixtures::GLUE_CALL, "cols").is_embedded_host());
    assert!(classify_at(fixtures::GLUE_CALL, "WHERE").is_embedded_sql());
}

#[test]
fn glue_stripped_sql_substitutes_placeholders() {
    match classify_at(fixtures::GLUE_CALL, "WHERE") {
        Classification::EmbeddedSql { stripped_sql, .. } => {
            assert_eq!(
                stripped_sql,
                "SELECT placeholder FROM placeholder WHERE id = placeholder"
            );
        }
        other => panic!("expected EmbeddedSql, got {other:?}"),
    }
}

#[test]
fn named_argument_off_allowlist_is_not_sql() {
    assert!(classify_at(fixtures::NAMED_ARGS, "thrifty").is_not_embedded());
}

#[test]
fn named_argument_on_allowlist_is_sql() {
    match classify_at(fixtures::NAMED_ARGS, "WHERE x") {
        Classification::EmbeddedSql { region, .. } => {
            assert_eq!(region.call_name, "sqlInterpolate");
        }
        other => panic!("expected EmbeddedSql, got {other:?}"),
    }
}

#[test]
fn commented_query_is_not_embedded() {
    assert!(classify_at(fixtures::COMMENTED, "legacy").is_not_embedded());
    assert!(classify_at(fixtures::COMMENTED, "current").is_embedded_sql());
}

#[test]
fn nested_call_attributes_to_inner_glue() {
    match classify_at(fixtures::NESTED_CALLS, "FROM {") {
        Classification::EmbeddedSql { region, .. } => {
            assert_eq!(region.call_name, "glue_sql");
            assert!(region.is_interpolated);
        }
        other => panic!("expected EmbeddedSql, got {other:?}"),
    }
}

#[test]
fn tricky_quoting_stays_one_region() {
    let mut detector = SqlIslandDetector::default();
    let regions = detector.regions(KEY, 1, fixtures::TRICKY_QUOTES);
    assert_eq!(regions.len(), 1);
    assert!(regions[0].raw_text.contains("#not a comment"));
}

#[test]
fn script_without_sql_has_no_regions() {
    let mut detector = SqlIslandDetector::default();
    assert!(detector.regions(KEY, 1, fixtures::NO_SQL).is_empty());
    assert!(classify_at(fixtures::NO_SQL, "not a query").is_not_embedded());
}

#[test]
fn cached_classification_is_stable_across_queries() {
    let mut detector = SqlIslandDetector::default();
    let (line, character) = position_of(fixtures::GLUE_CALL, "WHERE");
    let pos = Position::new(line, character);

    let first = detector.classify(KEY, 3, fixtures::GLUE_CALL, pos);
    let second = detector.classify(KEY, 3, fixtures::GLUE_CALL, pos);
    assert_eq!(first, second);
}

#[test]
fn oversized_document_classifies_everything_as_plain() {
    let config = DetectorConfig {
        max_document_size: 32,
        ..Default::default()
    };
    let mut detector = SqlIslandDetector::new(config).unwrap();

    assert!(detector.regions(KEY, 1, fixtures::SIMPLE_QUERY).is_empty());
    let (line, character) = position_of(fixtures::SIMPLE_QUERY, "FROM users");
    let result = detector.classify(
        KEY,
        1,
        fixtures::SIMPLE_QUERY,
        Position::new(line, character),
    );
    assert!(result.is_not_embedded());
}
