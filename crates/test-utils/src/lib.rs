// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Testing utilities
//!
//! Shared R source fixtures and position helpers for the detector and LSP
//! test suites. Positions in tests are located by searching for a snippet
//! of the fixture text instead of hand-counting columns, which keeps the
//! fixtures editable.

pub mod fixtures;

/// (line, character) of the first occurrence of `needle` in `text`
///
/// Both components are zero-based char counts, matching the detector's
/// position model.
///
/// # Panics
///
/// Panics when `needle` does not occur; fixtures and needles live next to
/// each other in test code, so a miss is a test bug.
pub fn position_of(text: &str, needle: &str) -> (u32, u32) {
    let byte = text
        .find(needle)
        .unwrap_or_else(|| panic!("needle {needle:?} not found in fixture"));
    let prefix = &text[..byte];
    let line = prefix.matches('\n').count() as u32;
    let character = prefix.rsplit('\n').next().unwrap_or(prefix).chars().count() as u32;
    (line, character)
}

/// Flat char offset of the first occurrence of `needle` in `text`
pub fn offset_of(text: &str, needle: &str) -> usize {
    let byte = text
        .find(needle)
        .unwrap_or_else(|| panic!("needle {needle:?} not found in fixture"));
    text[..byte].chars().count()
}
