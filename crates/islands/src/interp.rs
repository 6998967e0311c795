// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Interpolation-block analyzer
//!
//! Operates on the text *inside* a recognized SQL region. Glue-style calls
//! evaluate `{...}` blocks as host-language expressions before the SQL runs,
//! so a cursor inside a block needs host completions, not SQL completions,
//! and structural SQL checks must see the blocks replaced by a neutral
//! token.
//!
//! Brace nesting is tracked exactly like paren nesting in the
//! balanced-delimiter scanner, except that backticks are not string
//! delimiters here (interpolation payloads are host expressions, and the
//! SQL outside blocks quotes with `"` and `'`).

use crate::scan::{INTERP_QUOTES, QuoteTracker};

/// Token substituted for each top-level `{...}` block
///
/// A bare identifier, so stripped text keeps realistic token boundaries for
/// downstream structural checks.
pub const PLACEHOLDER: &str = "placeholder";

/// Whether `offset` (in chars, relative to `sql`) falls inside a `{...}`
/// interpolation block
pub fn is_inside_interpolation(sql: &str, offset: usize) -> bool {
    let mut depth = 0usize;
    let mut strings = QuoteTracker::new(INTERP_QUOTES);

    for (i, c) in sql.chars().enumerate() {
        if i >= offset {
            break;
        }
        if strings.step(c) {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    depth > 0
}

/// Replace every top-level balanced `{...}` block with [`PLACEHOLDER`]
///
/// Text outside blocks is preserved verbatim, newlines and whitespace
/// included. Nested braces are consumed as part of their outermost block.
/// An unmatched `{` drops the remainder of the string from that point on.
/// Running the function on its own output is a no-op.
pub fn strip_interpolations(sql: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut strings = QuoteTracker::new(INTERP_QUOTES);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if strings.step(c) {
            out.push(c);
            i += 1;
            continue;
        }

        if c != '{' {
            out.push(c);
            i += 1;
            continue;
        }

        match matching_brace_end(&chars, i) {
            Some(close) => {
                out.push_str(PLACEHOLDER);
                i = close + 1;
            }
            // Unterminated block: the remainder of the string is the
            // half-typed payload, not SQL
            None => break,
        }
    }

    out
}

/// Offset of the `}` matching the `{` at `open`, quote-aware
fn matching_brace_end(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut strings = QuoteTracker::new(INTERP_QUOTES);

    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        if strings.step(c) {
            continue;
        }
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
