// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Keyword Completion
//!
//! Keyword completion for cursor positions inside embedded SQL regions.
//!
//! ## Overview
//!
//! The completion list is schema-unaware: without a live database
//! connection the server offers the common SQL keyword vocabulary,
//! ordered so that statement starters rank above clause keywords.
//! Positions classified as host interpolation or plain R get no items.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

/// SQL keyword with completion metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SqlKeyword {
    /// The keyword text
    pub label: &'static str,
    /// Short description shown next to the item
    pub description: &'static str,
    /// Sort order (lower = higher priority)
    pub sort_priority: i32,
}

/// Keywords offered inside an embedded SQL region
///
/// Statement starters first, then clause keywords in rough query order.
pub const SQL_KEYWORDS: &[SqlKeyword] = &[
    SqlKeyword {
        label: "SELECT",
        description: "Retrieve data from tables",
        sort_priority: 1,
    },
    SqlKeyword {
        label: "INSERT",
        description: "Insert new rows into a table",
        sort_priority: 2,
    },
    SqlKeyword {
        label: "UPDATE",
        description: "Modify existing rows in a table",
        sort_priority: 3,
    },
    SqlKeyword {
        label: "DELETE",
        description: "Delete rows from a table",
        sort_priority: 4,
    },
    SqlKeyword {
        label: "WITH",
        description: "Common Table Expression (CTE)",
        sort_priority: 5,
    },
    SqlKeyword {
        label: "FROM",
        description: "Specify tables to query",
        sort_priority: 10,
    },
    SqlKeyword {
        label: "WHERE",
        description: "Filter rows",
        sort_priority: 11,
    },
    SqlKeyword {
        label: "GROUP BY",
        description: "Group rows by values",
        sort_priority: 12,
    },
    SqlKeyword {
        label: "HAVING",
        description: "Filter groups",
        sort_priority: 13,
    },
    SqlKeyword {
        label: "ORDER BY",
        description: "Sort result rows",
        sort_priority: 14,
    },
    SqlKeyword {
        label: "LIMIT",
        description: "Limit number of rows",
        sort_priority: 15,
    },
    SqlKeyword {
        label: "OFFSET",
        description: "Skip rows before limiting",
        sort_priority: 16,
    },
    SqlKeyword {
        label: "JOIN",
        description: "Join with another table",
        sort_priority: 17,
    },
    SqlKeyword {
        label: "INNER JOIN",
        description: "Inner join with another table",
        sort_priority: 18,
    },
    SqlKeyword {
        label: "LEFT JOIN",
        description: "Left outer join",
        sort_priority: 19,
    },
    SqlKeyword {
        label: "RIGHT JOIN",
        description: "Right outer join",
        sort_priority: 20,
    },
    SqlKeyword {
        label: "CROSS JOIN",
        description: "Cross join",
        sort_priority: 21,
    },
    SqlKeyword {
        label: "ON",
        description: "Join condition",
        sort_priority: 22,
    },
    SqlKeyword {
        label: "UNION",
        description: "Combine result sets",
        sort_priority: 23,
    },
    SqlKeyword {
        label: "UNION ALL",
        description: "Combine result sets with duplicates",
        sort_priority: 24,
    },
    SqlKeyword {
        label: "DISTINCT",
        description: "Remove duplicate rows",
        sort_priority: 25,
    },
    SqlKeyword {
        label: "AS",
        description: "Alias a column or table",
        sort_priority: 26,
    },
    SqlKeyword {
        label: "AND",
        description: "Logical conjunction",
        sort_priority: 27,
    },
    SqlKeyword {
        label: "OR",
        description: "Logical disjunction",
        sort_priority: 28,
    },
    SqlKeyword {
        label: "NOT",
        description: "Logical negation",
        sort_priority: 29,
    },
    SqlKeyword {
        label: "IN",
        description: "Membership test",
        sort_priority: 30,
    },
    SqlKeyword {
        label: "LIKE",
        description: "Pattern match",
        sort_priority: 31,
    },
    SqlKeyword {
        label: "BETWEEN",
        description: "Range test",
        sort_priority: 32,
    },
    SqlKeyword {
        label: "IS NULL",
        description: "Null test",
        sort_priority: 33,
    },
    SqlKeyword {
        label: "CASE",
        description: "Conditional expression",
        sort_priority: 34,
    },
];

/// Build the completion item list for an embedded SQL position
pub fn keyword_completions() -> Vec<CompletionItem> {
    SQL_KEYWORDS
        .iter()
        .map(|kw| CompletionItem {
            label: kw.label.to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some(kw.description.to_string()),
            sort_text: Some(format!("{:03}", kw.sort_priority)),
            ..Default::default()
        })
        .collect()
}
