// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Cursor classifier
//!
//! The orchestrator: given document text, its version token and a cursor
//! position, decides whether the cursor sits in plain R, in embedded SQL,
//! or inside a `{...}` interpolation block where the host language has
//! authority again.
//!
//! Classification is pure and synchronous; the only state is the region
//! cache, which memoizes whole-document scans per version token so that
//! per-keystroke queries are lookups, not rescans.

use crate::cache::RegionIndex;
use crate::config::{ConfigError, DetectorConfig};
use crate::interp::{is_inside_interpolation, strip_interpolations};
use crate::line_index::LineIndex;
use crate::position::Position;
use crate::region::{SqlRegion, scan_regions};
use crate::scan::{QuoteTracker, R_QUOTES};
use std::sync::Arc;
use tracing::debug;

/// What kind of completion applies at a cursor position
///
/// `EmbeddedSql` carries everything downstream consumers need: the region,
/// its owning call, and the interpolation-stripped text for structural
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Plain host-language code, a non-SQL string, or a comment
    NotEmbedded,

    /// Inside a recognized SQL region, outside any interpolation block
    EmbeddedSql {
        /// The enclosing region
        region: SqlRegion,
        /// Region text with `{...}` blocks replaced by a placeholder
        stripped_sql: String,
    },

    /// Inside an interpolation block of a recognized SQL region; the host
    /// language owns completion here
    EmbeddedHost {
        /// The enclosing region
        region: SqlRegion,
    },
}

impl Classification {
    /// Check if this is the not-embedded classification
    pub fn is_not_embedded(&self) -> bool {
        matches!(self, Classification::NotEmbedded)
    }

    /// Check if this is the embedded-SQL classification
    pub fn is_embedded_sql(&self) -> bool {
        matches!(self, Classification::EmbeddedSql { .. })
    }

    /// Check if this is the embedded-host classification
    pub fn is_embedded_host(&self) -> bool {
        matches!(self, Classification::EmbeddedHost { .. })
    }
}

/// The embedded-SQL detector
///
/// Owns the configuration and the region cache. Construct one per
/// application with explicit configuration and pass it by handle to
/// whoever needs classification; there is no global instance.
#[derive(Debug)]
pub struct SqlIslandDetector {
    config: DetectorConfig,
    cache: RegionIndex,
}

impl SqlIslandDetector {
    /// Create a detector with the given configuration
    ///
    /// The configuration is validated eagerly; a malformed call-name set
    /// or a zero limit is rejected here, never at scan time.
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = RegionIndex::new(config.cache_expiry());
        Ok(Self { config, cache })
    }

    /// The active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Replace the configuration, dropping all cached regions
    pub fn set_config(&mut self, config: DetectorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.cache = RegionIndex::new(config.cache_expiry());
        self.config = config;
        Ok(())
    }

    /// All SQL regions of the document identified by `key` at `version`
    ///
    /// Served from cache when the version token matches and the entry is
    /// fresh; otherwise the document is rescanned and the cache updated.
    pub fn regions(&mut self, key: &str, version: i32, text: &str) -> Arc<Vec<SqlRegion>> {
        if let Some(regions) = self.cache.get(key, version) {
            return regions;
        }

        debug!("Region cache miss for {} v{}, scanning", key, version);
        let regions = scan_regions(text, &self.config);
        self.cache.update(key, version, regions)
    }

    /// Classify the cursor position in the document identified by `key`
    pub fn classify(
        &mut self,
        key: &str,
        version: i32,
        text: &str,
        position: Position,
    ) -> Classification {
        let line_index = LineIndex::new(text);
        let Some(offset) = line_index.offset(position) else {
            return Classification::NotEmbedded;
        };

        let chars: Vec<char> = text.chars().collect();
        if in_line_comment(&chars, &line_index, position) {
            return Classification::NotEmbedded;
        }

        let regions = self.regions(key, version, text);
        let Some(region) = regions.iter().find(|r| r.contains_offset(offset)) else {
            return Classification::NotEmbedded;
        };

        if region.is_interpolated
            && is_inside_interpolation(&region.raw_text, offset - region.start_offset)
        {
            return Classification::EmbeddedHost {
                region: region.clone(),
            };
        }

        let stripped_sql = if region.is_interpolated {
            strip_interpolations(&region.raw_text)
        } else {
            region.raw_text.clone()
        };

        Classification::EmbeddedSql {
            region: region.clone(),
            stripped_sql,
        }
    }

    /// Drop cached regions for one document (edited or closed)
    pub fn invalidate(&mut self, key: &str) {
        self.cache.invalidate(key);
    }

    /// Drop every cached entry
    pub fn clear_all(&mut self) {
        self.cache.clear_all();
    }
}

impl Default for SqlIslandDetector {
    fn default() -> Self {
        // The default configuration is validated by a unit test; this
        // cannot fail at runtime.
        Self::new(DetectorConfig::default()).expect("default configuration is valid")
    }
}

/// Whether `position` sits in a line comment
///
/// Replays the line from its start with the string machine; the first `#`
/// outside a string literal starts a comment, and everything from there on
/// (the `#` included) classifies as not-embedded.
fn in_line_comment(chars: &[char], line_index: &LineIndex, position: Position) -> bool {
    let line = position.line as usize;
    let Some(start) = line_index.line_start(line) else {
        return false;
    };
    let Some(end) = line_index.line_end(line) else {
        return false;
    };
    let cursor = start + position.character as usize;

    let mut strings = QuoteTracker::new(R_QUOTES);
    for (i, &c) in chars.iter().enumerate().take(end.min(cursor + 1)).skip(start) {
        if i == cursor {
            return false;
        }
        if strings.step(c) {
            continue;
        }
        if c == '#' {
            return true;
        }
    }

    false
}
