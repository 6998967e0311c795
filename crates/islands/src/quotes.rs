// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Quoted-region extractor
//!
//! Finds the string literal enclosing a cursor offset. Opening quotes are
//! located on the cursor's own line (a string never opens on an earlier line
//! for this entry point); the matching closing quote may sit any number of
//! lines further down.

use crate::line_index::LineIndex;
use crate::scan::{QuoteTracker, R_QUOTES};

/// Content span of the string literal enclosing `offset`
///
/// The returned `(start, end)` excludes both quote characters; `end` is
/// exclusive. Returns None when `offset` is not inside a string on its line,
/// or when the string is never terminated before the end of text
/// (mid-typing literals are not regions).
pub fn string_content_range_at(
    chars: &[char],
    line_index: &LineIndex,
    offset: usize,
) -> Option<(usize, usize)> {
    if offset > chars.len() {
        return None;
    }

    let line = line_index.line_of(offset);
    let line_start = line_index.line_start(line)?;

    // Replay the line up to the cursor; if we end up inside a string the
    // tracker knows where it opened and with which quote character.
    let mut strings = QuoteTracker::new(R_QUOTES);
    for &c in chars.iter().take(offset).skip(line_start) {
        strings.step(c);
    }

    if !strings.in_string() {
        return None;
    }

    let open = line_start + strings.opened_at()?;
    let quote = strings.quote()?;
    let end = matching_quote_end(chars, open, quote)?;

    Some((open + 1, end))
}

/// Offset of the unescaped closing quote matching the opening quote at
/// `open`, searching forward across line boundaries
pub(crate) fn matching_quote_end(chars: &[char], open: usize, quote: char) -> Option<usize> {
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(i);
        }
    }

    None
}
