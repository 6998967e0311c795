// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Call-context resolver
//!
//! Decides whether a string literal is the SQL argument of a recognized
//! call. Works backward from the literal through a bounded window of
//! preceding text, finds every configured call name that opens a call
//! containing the literal, picks the innermost one, and then applies the
//! named-argument rules:
//!
//! - any named argument disqualifies an interpolated-SQL call
//! - a named argument of a direct-SQL call survives only if the parameter
//!   is on that call's allowlist (`sql = "..."`, `statement = "..."`)
//!
//! This is what keeps `readData(x, prudence = "thrifty")` from ever being
//! classified as SQL while `dbGetQuery(con, statement = "SELECT 1")` still
//! is.

use crate::config::{DetectorConfig, is_ident_char};
use crate::line_index::LineIndex;
use crate::scan::find_matching_close;
use tracing::debug;

/// The call that owns a string literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Matched call name, always a member of the configured set
    pub call_name: String,

    /// Whether the call interpolates `{...}` blocks in its SQL
    pub is_interpolated: bool,
}

/// A call-name occurrence followed by an opening parenthesis
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallSite<'a> {
    pub(crate) name: &'a str,
    pub(crate) is_interpolated: bool,
    /// Offset of the opening `(`
    pub(crate) open: usize,
}

/// Collect call sites for every configured name inside `chars[lo..hi]`
///
/// A name matches only as a whole identifier (`sql` never matches inside
/// `madeup_sql`) and must be followed, after at most
/// `max_paren_search_distance` whitespace chars, by `(`. Collection stops
/// at `max_function_matches` sites; the overflow is logged and dropped,
/// never scanned unboundedly.
pub(crate) fn call_sites_in<'a>(
    chars: &[char],
    lo: usize,
    hi: usize,
    config: &'a DetectorConfig,
) -> Vec<CallSite<'a>> {
    let mut sites = Vec::new();
    let hi = hi.min(chars.len());

    for (name, is_interpolated) in config.call_names.iter_names() {
        let name_chars: Vec<char> = name.chars().collect();
        if name_chars.is_empty() || lo + name_chars.len() > hi {
            continue;
        }

        for start in lo..=hi - name_chars.len() {
            if chars[start..start + name_chars.len()] != name_chars[..] {
                continue;
            }

            // Whole-identifier match only
            if start > 0 && is_ident_char(chars[start - 1]) {
                continue;
            }
            let after = start + name_chars.len();
            if chars.get(after).copied().is_some_and(is_ident_char) {
                continue;
            }

            // The opening paren may sit a bounded distance further on
            let mut open = after;
            let limit = after + config.max_paren_search_distance;
            while open < chars.len() && open < limit && chars[open].is_whitespace() {
                open += 1;
            }
            if chars.get(open) != Some(&'(') {
                continue;
            }

            if sites.len() >= config.max_function_matches {
                debug!(
                    "Call-site limit of {} reached, ignoring further matches",
                    config.max_function_matches
                );
                return sites;
            }

            sites.push(CallSite {
                name,
                is_interpolated,
                open,
            });
        }
    }

    sites
}

/// Resolve which configured call (if any) owns the string starting at
/// `region_start`
///
/// `region_start` is the content start of the literal: the offset just
/// after its opening quote. Returns None when no configured call contains
/// the literal or when the named-argument rules disqualify it.
pub fn resolve_call_context(
    chars: &[char],
    line_index: &LineIndex,
    region_start: usize,
    config: &DetectorConfig,
) -> Option<CallContext> {
    if region_start == 0 {
        return None;
    }

    // Formatters may push the call name several lines above the literal;
    // look back a bounded number of lines for candidates.
    let line = line_index.line_of(region_start);
    let window_lo = line_index
        .line_start(line.saturating_sub(config.context_line_lookback))
        .unwrap_or(0);

    let mut best: Option<CallSite> = None;
    for site in call_sites_in(chars, window_lo, region_start, config) {
        if site.open >= region_start {
            continue;
        }

        // A call with no closing paren is still being typed; treat it as
        // extending to the end of the text.
        let bound = chars.len().min(site.open + config.max_function_call_length);
        let close = find_matching_close(&chars[..bound], site.open);
        let contains = close.is_none_or(|c| region_start <= c);
        if !contains {
            continue;
        }

        // Innermost enclosing call wins; ties keep the earlier candidate,
        // which follows the configured name order.
        match best {
            Some(b) if site.open <= b.open => {}
            _ => best = Some(site),
        }
    }

    let site = best?;

    if let Some(param) = named_arg_param(chars, region_start - 1, config) {
        if site.is_interpolated {
            debug!(
                "Named argument {:?} disqualifies interpolated call {}",
                param, site.name
            );
            return None;
        }
        if !config.call_names.allows_named_arg(site.name, &param) {
            debug!(
                "Named argument {:?} of {} is not on the SQL allowlist",
                param, site.name
            );
            return None;
        }
    }

    Some(CallContext {
        call_name: site.name.to_string(),
        is_interpolated: site.is_interpolated,
    })
}

/// Parameter name when the string at `quote_pos` is a named argument
///
/// Looks backward from the opening quote through at most
/// `named_arg_lookback` chars, crossing at most one line boundary, for a
/// `=` that is not part of a comparison operator, then reads the parameter
/// identifier before it. Returns None for positional arguments and
/// whenever the budget runs out.
fn named_arg_param(chars: &[char], quote_pos: usize, config: &DetectorConfig) -> Option<String> {
    let mut i = quote_pos;
    let mut budget = config.named_arg_lookback;
    let mut newlines = 0;

    // Skip whitespace back to the first significant char
    loop {
        if i == 0 || budget == 0 {
            return None;
        }
        i -= 1;
        budget -= 1;
        let c = chars[i];
        if c == '\n' {
            newlines += 1;
            if newlines > 1 {
                return None;
            }
        } else if !c.is_whitespace() {
            break;
        }
    }

    if chars[i] != '=' {
        return None;
    }
    // ==, <=, >=, != are comparisons, not argument binding
    if i > 0 && matches!(chars[i - 1], '=' | '<' | '>' | '!') {
        return None;
    }

    // Skip whitespace between the parameter name and the `=`
    loop {
        if i == 0 || budget == 0 {
            return None;
        }
        i -= 1;
        budget -= 1;
        let c = chars[i];
        if c == '\n' {
            newlines += 1;
            if newlines > 1 {
                return None;
            }
        } else if !c.is_whitespace() {
            break;
        }
    }

    // Read the identifier backward
    let end = i + 1;
    let mut start = end;
    while start > 0 && budget > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
        budget -= 1;
    }
    if start == end {
        return None;
    }

    Some(chars[start..end].iter().collect())
}
