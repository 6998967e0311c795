// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Positions and ranges
//!
//! Plain (line, character) coordinates used throughout the detector.
//!
//! These mirror the LSP wire types but stay independent of any protocol
//! crate so the core compiles for embedders that are not language servers.
//! Characters count Unicode scalar values, matching rope char indexing in
//! the document layer.

use serde::{Deserialize, Serialize};

/// A (line, character) location in document text
///
/// Both components are zero-based. `character` may equal the line length
/// (cursor sitting at the end of the line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    /// Create a new position
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.line, self.character).cmp(&(other.line, other.character))
    }
}

/// An ordered pair of positions with `start <= end`
///
/// By convention ranges over string content are end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a new range
    ///
    /// Debug builds assert the ordering invariant.
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "range start must not exceed end");
        Self { start, end }
    }

    /// Whether `position` falls inside the range (start-inclusive, end-exclusive)
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}
