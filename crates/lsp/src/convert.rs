// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Conversions between detector positions and LSP wire types.
//!
//! Both sides use zero-based line and character counts, so the mapping
//! is field-for-field.

use tower_lsp::lsp_types;

/// Convert an LSP position into a detector position
pub fn to_core_position(position: lsp_types::Position) -> r_sql_islands::Position {
    r_sql_islands::Position::new(position.line, position.character)
}

/// Convert a detector range into an LSP range
pub fn to_lsp_range(range: &r_sql_islands::Range) -> lsp_types::Range {
    lsp_types::Range {
        start: lsp_types::Position {
            line: range.start.line,
            character: range.start.character,
        },
        end: lsp_types::Position {
            line: range.end.line,
            character: range.end.character,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_position() {
        let lsp = lsp_types::Position {
            line: 3,
            character: 14,
        };
        let core = to_core_position(lsp);
        assert_eq!(core.line, 3);
        assert_eq!(core.character, 14);
    }

    #[test]
    fn test_range_conversion() {
        let range = r_sql_islands::Range::new(
            r_sql_islands::Position::new(1, 2),
            r_sql_islands::Position::new(1, 10),
        );
        let lsp = to_lsp_range(&range);
        assert_eq!(lsp.start.line, 1);
        assert_eq!(lsp.end.character, 10);
    }
}
