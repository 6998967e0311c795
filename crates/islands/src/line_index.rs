// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Line index
//!
//! Conversion table between (line, character) positions and flat char
//! offsets, built once per scanned text. The detector works on char offsets
//! internally; the host editor speaks positions.

use crate::position::Position;

/// Line-start table for a fixed snapshot of text
///
/// Offsets are Unicode scalar value counts, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Char offset of the first character of each line
    line_starts: Vec<usize>,

    /// Total length in chars
    len: usize,
}

impl LineIndex {
    /// Build the index for `text`
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0;

        for (i, c) in text.chars().enumerate() {
            len = i + 1;
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }

        Self { line_starts, len }
    }

    /// Number of lines (a trailing newline starts a final empty line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Total text length in chars
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the indexed text was empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Char offset of the start of `line`, or None past the last line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Char offset one past the last character of `line`, excluding the
    /// line terminator
    pub fn line_end(&self, line: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let next = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.len + 1);
        // next points past the '\n' of this line (or past EOF + 1)
        Some((next - 1).max(start))
    }

    /// Convert a position to a flat char offset
    ///
    /// Returns None for lines past the end or characters past the line
    /// terminator. A character exactly at the line end is valid.
    pub fn offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;

        let offset = start + position.character as usize;
        if offset > end {
            return None;
        }
        Some(offset)
    }

    /// Convert a flat char offset back to a position
    ///
    /// Offsets at or past the end of text map to the end of the last line.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let character = offset - self.line_starts[line];
        Position::new(line as u32, character as u32)
    }

    /// Line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        self.position(offset).line as usize
    }
}
