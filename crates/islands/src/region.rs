// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL regions
//!
//! A region is one recognized embedded-SQL string literal together with its
//! metadata. The whole-document scan composes the balanced-delimiter
//! scanner, the quoted-region extractor and the call-context resolver over
//! every configured call name, producing the ordered region sequence the
//! cache holds per document version.

use crate::calls::{call_sites_in, resolve_call_context};
use crate::config::DetectorConfig;
use crate::line_index::LineIndex;
use crate::position::Range;
use crate::quotes::matching_quote_end;
use crate::scan::{QuoteTracker, R_QUOTES, find_matching_close};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One recognized embedded-SQL string literal
///
/// `range` and the offsets cover the *content* of the literal, exclusive of
/// both quote characters. Regions are immutable snapshots tied to the
/// document version that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlRegion {
    /// Content span as (line, character) positions
    pub range: Range,

    /// Content start as a flat char offset (inclusive)
    pub start_offset: usize,

    /// Content end as a flat char offset (exclusive)
    pub end_offset: usize,

    /// The call that owns the literal; always a configured name
    pub call_name: String,

    /// Whether the literal spans more than one line
    pub is_multiline: bool,

    /// Whether `{...}` blocks inside the literal are host-language code
    pub is_interpolated: bool,

    /// The literal's content, verbatim
    pub raw_text: String,
}

impl SqlRegion {
    /// Whether the flat char offset falls inside the region
    /// (start-inclusive, end-exclusive)
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset < self.end_offset
    }
}

/// Scan a whole document for SQL regions
///
/// Documents larger than `max_document_size` bytes are not scanned at all
/// and report no regions; that is deliberate degradation, not failure. The
/// result is ordered by start offset and free of duplicates.
pub fn scan_regions(text: &str, config: &DetectorConfig) -> Vec<SqlRegion> {
    if text.len() > config.max_document_size {
        debug!(
            "Document of {} bytes exceeds the {} byte scan limit, skipping",
            text.len(),
            config.max_document_size
        );
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let line_index = LineIndex::new(text);

    // Keyed by content start so a literal seen from both an outer and an
    // inner call is recorded once.
    let mut regions: BTreeMap<usize, SqlRegion> = BTreeMap::new();

    for site in call_sites_in(&chars, 0, chars.len(), config) {
        let bound = chars.len().min(site.open + config.max_function_call_length);
        let close = find_matching_close(&chars[..bound], site.open);
        let call_end = close.unwrap_or(bound);

        // Walk the argument text for string literals
        let mut strings = QuoteTracker::new(R_QUOTES);
        let mut i = site.open + 1;
        while i < call_end {
            let was_in_string = strings.in_string();
            strings.step(chars[i]);

            if strings.in_string() && !was_in_string {
                let quote_open = i;
                let Some(quote_close) =
                    matching_quote_end(&chars, quote_open, chars[quote_open])
                else {
                    // Unterminated literal: mid-typing, not a region
                    break;
                };

                let start = quote_open + 1;
                if !regions.contains_key(&start) {
                    if let Some(ctx) = resolve_call_context(&chars, &line_index, start, config) {
                        let raw_text: String = chars[start..quote_close].iter().collect();
                        regions.insert(
                            start,
                            SqlRegion {
                                range: Range::new(
                                    line_index.position(start),
                                    line_index.position(quote_close),
                                ),
                                start_offset: start,
                                end_offset: quote_close,
                                call_name: ctx.call_name,
                                is_multiline: raw_text.contains('\n'),
                                is_interpolated: ctx.is_interpolated,
                                raw_text,
                            },
                        );
                    }
                }

                // Resume after the closing quote regardless of whether the
                // literal qualified as SQL
                strings = QuoteTracker::new(R_QUOTES);
                i = quote_close + 1;
                continue;
            }

            i += 1;
        }
    }

    let regions: Vec<SqlRegion> = regions.into_values().collect();
    debug!("Scan found {} SQL region(s)", regions.len());
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<SqlRegion> {
        scan_regions(text, &DetectorConfig::default())
    }

    #[test]
    fn test_scan_single_region() {
        let regions = scan(r#"dbGetQuery(con, "SELECT 1")"#);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].raw_text, "SELECT 1");
        assert_eq!(regions[0].call_name, "dbGetQuery");
        assert!(!regions[0].is_interpolated);
        assert!(!regions[0].is_multiline);
    }

    #[test]
    fn test_scan_excludes_quote_characters() {
        let text = r#"dbGetQuery(con, "SELECT 1")"#;
        let regions = scan(text);
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(chars[regions[0].start_offset - 1], '"');
        assert_eq!(chars[regions[0].end_offset], '"');
    }

    #[test]
    fn test_scan_multiple_regions_ordered() {
        let text = "dbGetQuery(con, \"SELECT 1\")\nglue_sql(\"SELECT {x}\", .con = con)\n";
        let regions = scan(text);
        assert_eq!(regions.len(), 2);
        assert!(regions[0].start_offset < regions[1].start_offset);
        assert_eq!(regions[0].call_name, "dbGetQuery");
        assert_eq!(regions[1].call_name, "glue_sql");
        assert!(regions[1].is_interpolated);
    }

    #[test]
    fn test_scan_multiline_region() {
        let text = "dbGetQuery(\n  con,\n  \"\n  SELECT 1\n\"\n)";
        let regions = scan(text);
        assert_eq!(regions.len(), 1);
        assert!(regions[0].is_multiline);
        assert_eq!(regions[0].raw_text, "\n  SELECT 1\n");
    }

    #[test]
    fn test_scan_ignores_non_sql_strings() {
        let regions = scan(r#"paste("not sql"); dbGetQuery(con, "SELECT 1")"#);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].raw_text, "SELECT 1");
    }

    #[test]
    fn test_scan_excludes_named_non_sql_arguments() {
        let regions = scan(r#"dbGetQuery(con, "SELECT 1", prudence = "thrifty")"#);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].raw_text, "SELECT 1");
    }

    #[test]
    fn test_scan_nested_call_attributed_to_inner() {
        let text = r#"dbGetQuery(con, glue_sql("SELECT {x} FROM t", .con = con))"#;
        let regions = scan(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].call_name, "glue_sql");
        assert!(regions[0].is_interpolated);
    }

    #[test]
    fn test_scan_unterminated_literal_skipped() {
        let regions = scan(r#"dbGetQuery(con, "SELECT "#);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_scan_oversized_document_degrades() {
        let config = DetectorConfig {
            max_document_size: 16,
            ..Default::default()
        };
        let regions = scan_regions(r#"dbGetQuery(con, "SELECT 1")"#, &config);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_scan_call_site_limit_bounds_regions() {
        let config = DetectorConfig {
            max_function_matches: 3,
            ..Default::default()
        };
        let text: String = (0..20)
            .map(|i| format!("dbGetQuery(con, \"SELECT {i}\")\n"))
            .collect();

        let regions = scan_regions(&text, &config);
        assert_eq!(regions.len(), 3);
        // The surviving regions are still well-formed
        assert!(regions.iter().all(|r| r.raw_text.starts_with("SELECT")));
    }

    #[test]
    fn test_scan_escaped_quotes_inside_literal() {
        let text = r#"dbGetQuery(con, "SELECT \"a\" FROM t")"#;
        let regions = scan(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].raw_text, r#"SELECT \"a\" FROM t"#);
    }

    #[test]
    fn test_region_contains_offset_is_end_exclusive() {
        let regions = scan(r#"dbGetQuery(con, "SELECT 1")"#);
        let region = &regions[0];
        assert!(region.contains_offset(region.start_offset));
        assert!(region.contains_offset(region.end_offset - 1));
        assert!(!region.contains_offset(region.end_offset));
        assert!(!region.contains_offset(region.start_offset - 1));
    }
}
