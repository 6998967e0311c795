// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Balanced-delimiter scanner
//!
//! The lowest-level primitive of the island grammar: forward scanning for a
//! matching closing parenthesis while staying aware of string literals, so
//! parentheses inside quoted text never affect nesting depth.
//!
//! All functions here are total over any char slice and any offset; a scan
//! that runs off the end of the text reports `None` rather than failing.
//! Callers treat `None` as "the call is still being typed and extends to the
//! end of the available text".

/// Quote characters that open a string in R source
pub const R_QUOTES: &[char] = &['"', '\'', '`'];

/// Quote characters recognized inside interpolation payloads
///
/// Backticks are not string delimiters there; interpolation payloads are
/// host-language expressions.
pub const INTERP_QUOTES: &[char] = &['"', '\''];

/// Incremental string-literal state machine
///
/// Feed characters one at a time; the tracker reports whether each char
/// belongs to a string literal (delimiters included). Only the exact opening
/// quote character closes a string, and a quote preceded by an unconsumed
/// backslash never closes one.
#[derive(Debug, Clone)]
pub(crate) struct QuoteTracker {
    delimiters: &'static [char],
    quote: Option<char>,
    escaped: bool,
    opened_at: Option<usize>,
    index: usize,
}

impl QuoteTracker {
    pub(crate) fn new(delimiters: &'static [char]) -> Self {
        Self {
            delimiters,
            quote: None,
            escaped: false,
            opened_at: None,
            index: 0,
        }
    }

    /// Advance past one character; returns true if it is part of a string
    pub(crate) fn step(&mut self, c: char) -> bool {
        let i = self.index;
        self.index += 1;

        match self.quote {
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == q {
                    self.quote = None;
                    self.opened_at = None;
                }
                true
            }
            None => {
                if self.delimiters.contains(&c) {
                    self.quote = Some(c);
                    self.opened_at = Some(i);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Whether the tracker is currently inside a string literal
    pub(crate) fn in_string(&self) -> bool {
        self.quote.is_some()
    }

    /// Offset of the opening quote of the current string, if any
    pub(crate) fn opened_at(&self) -> Option<usize> {
        self.opened_at
    }

    /// The quote character that opened the current string, if any
    pub(crate) fn quote(&self) -> Option<char> {
        self.quote
    }
}

/// Find the closing parenthesis matching the `(` at `open`
///
/// `chars[open]` is assumed to be the opening parenthesis. Nesting is
/// tracked from there; parentheses inside string literals are ignored.
/// Returns the offset of the matching `)`, or None when the text ends
/// before depth returns to zero.
pub fn find_matching_close(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut strings = QuoteTracker::new(R_QUOTES);

    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        if strings.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
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

/// Whether `pos` sits inside at least one unclosed parenthesis
///
/// Computed with the same string-aware scan as [`find_matching_close`],
/// starting from the beginning of `chars`. Surplus closing parens clamp the
/// depth at zero rather than going negative.
pub fn is_inside_parens(chars: &[char], pos: usize) -> bool {
    let mut depth = 0usize;
    let mut strings = QuoteTracker::new(R_QUOTES);

    for &c in chars.iter().take(pos) {
        if strings.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    depth > 0
}

/// Whether every parenthesis in `text` is balanced, ignoring parens inside
/// string literals
///
/// Used by the structural diagnostic over interpolation-stripped SQL.
pub fn is_balanced(text: &str) -> bool {
    let mut depth = 0i64;
    let mut strings = QuoteTracker::new(INTERP_QUOTES);

    for c in text.chars() {
        if strings.step(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }

    depth == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_matching_close_flat() {
        let text = chars("f(a, b)");
        assert_eq!(find_matching_close(&text, 1), Some(6));
    }

    #[test]
    fn test_matching_close_nested() {
        let text = chars("f(g(h(x)), y)");
        assert_eq!(find_matching_close(&text, 1), Some(12));
        assert_eq!(find_matching_close(&text, 3), Some(8));
        assert_eq!(find_matching_close(&text, 5), Some(7));
    }

    #[test]
    fn test_matching_close_unterminated() {
        let text = chars("f(a, g(b)");
        assert_eq!(find_matching_close(&text, 1), None);
    }

    #[test]
    fn test_paren_inside_string_ignored() {
        let text = chars(r#"f("(((", x)"#);
        assert_eq!(find_matching_close(&text, 1), Some(10));
    }

    #[test]
    fn test_close_paren_inside_string_ignored() {
        let text = chars(r#"f("a) b", x)"#);
        assert_eq!(find_matching_close(&text, 1), Some(11));
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        // The \" stays inside the string, so the ) after it is invisible
        let text = chars(r#"f("a \" ) b", x)"#);
        assert_eq!(find_matching_close(&text, 1), Some(15));
    }

    #[test]
    fn test_double_backslash_then_quote_closes() {
        // \\ is a literal backslash; the following quote closes the string
        let text = chars(r#"f("a\\")"#);
        assert_eq!(find_matching_close(&text, 1), Some(7));
    }

    #[test]
    fn test_mismatched_quote_types_do_not_cross_terminate() {
        // The double quote inside the single-quoted string is literal
        let text = chars(r#"f('a " b', x)"#);
        assert_eq!(find_matching_close(&text, 1), Some(12));
    }

    #[test]
    fn test_backtick_string() {
        let text = chars("f(`a ) b`, x)");
        assert_eq!(find_matching_close(&text, 1), Some(12));
    }

    #[test]
    fn test_is_inside_parens() {
        let text = chars("x <- f(a, b) + g(c");
        assert!(!is_inside_parens(&text, 5));
        assert!(is_inside_parens(&text, 8));
        assert!(!is_inside_parens(&text, 13));
        assert!(is_inside_parens(&text, 18));
    }

    #[test]
    fn test_is_inside_parens_surplus_close_clamps() {
        let text = chars("))) (x");
        assert!(is_inside_parens(&text, 6));
        assert!(!is_inside_parens(&text, 3));
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced("SELECT count(*) FROM t"));
        assert!(!is_balanced("SELECT count(* FROM t"));
        assert!(!is_balanced("SELECT a) FROM t"));
        assert!(is_balanced("SELECT ')' FROM t WHERE x = '('"));
    }
}
