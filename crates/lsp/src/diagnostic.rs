// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Diagnostics
//!
//! Lightweight structural checks over detected SQL regions.
//!
//! ## Overview
//!
//! Without a SQL parser the server still catches the most common
//! copy-paste mistake in embedded queries: unbalanced parentheses.
//! Interpolation blocks are stripped to placeholders first, so braces
//! holding arbitrary R code never trip the check.
//!
//! ## Architecture
//!
//! ```text
//! Document → scan_regions → balance check → LSP Diagnostic → Client
//! ```

use r_sql_islands::{SqlRegion, is_balanced, strip_interpolations};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};
use tracing::debug;

use crate::convert::to_lsp_range;

/// Diagnostic code identifying the type of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Unbalanced parentheses in an embedded query
    UnbalancedParens,
}

impl DiagnosticCode {
    /// Get the string representation of this diagnostic code
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnbalancedParens => "SQL-BALANCE-001",
        }
    }
}

impl From<DiagnosticCode> for NumberOrString {
    fn from(code: DiagnosticCode) -> Self {
        NumberOrString::String(code.as_str().to_string())
    }
}

/// Collect diagnostics for the detected regions of one document
///
/// Each unbalanced region yields a single warning spanning the whole
/// region. An empty result clears previously published diagnostics.
pub fn collect_diagnostics(regions: &[SqlRegion]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for region in regions {
        let sql = if region.is_interpolated {
            strip_interpolations(&region.raw_text)
        } else {
            region.raw_text.clone()
        };

        if !is_balanced(&sql) {
            debug!(
                call_name = %region.call_name,
                "unbalanced parentheses in embedded query"
            );
            diagnostics.push(Diagnostic {
                range: to_lsp_range(&region.range),
                severity: Some(DiagnosticSeverity::WARNING),
                code: Some(DiagnosticCode::UnbalancedParens.into()),
                source: Some(crate::SERVER_NAME.to_string()),
                message: format!(
                    "Unbalanced parentheses in query passed to {}",
                    region.call_name
                ),
                ..Default::default()
            });
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use r_sql_islands::{DetectorConfig, scan_regions};

    fn regions_of(text: &str) -> Vec<SqlRegion> {
        scan_regions(text, &DetectorConfig::default())
    }

    #[test]
    fn test_balanced_query_is_clean() {
        let regions = regions_of(r#"dbGetQuery(con, "SELECT count(*) FROM t")"#);
        assert_eq!(regions.len(), 1);
        assert!(collect_diagnostics(&regions).is_empty());
    }

    #[test]
    fn test_unbalanced_query_warns() {
        let regions = regions_of(r#"dbGetQuery(con, "SELECT count(* FROM t")"#);
        assert_eq!(regions.len(), 1);

        let diagnostics = collect_diagnostics(&regions);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
        assert!(diagnostics[0].message.contains("dbGetQuery"));
    }

    #[test]
    fn test_interpolation_braces_do_not_warn() {
        let regions = regions_of(
            r#"glue_sql("SELECT * FROM t WHERE id IN ({ids})", .con = con)"#,
        );
        assert_eq!(regions.len(), 1);
        assert!(collect_diagnostics(&regions).is_empty());
    }

    #[test]
    fn test_quoted_paren_in_sql_literal_is_ignored() {
        let regions = regions_of(r#"dbGetQuery(con, "SELECT * FROM t WHERE s = '('")"#);
        assert_eq!(regions.len(), 1);
        assert!(collect_diagnostics(&regions).is_empty());
    }
}
