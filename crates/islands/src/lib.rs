// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # r-sql-islands
//!
//! Island-grammar detection of SQL string literals embedded in R source.
//!
//! ## Overview
//!
//! R code talks to databases through calls like `dbGetQuery(con, "...")`
//! and `glue_sql("... {expr} ...")`. This crate finds those string
//! literals without parsing R: a bounded, error-tolerant lexical scanner
//! locates quoted regions, attributes them to a configured set of
//! SQL-bearing calls, and classifies any cursor position as plain R,
//! embedded SQL, or host-language code inside an interpolation block.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        SqlIslandDetector (classify)     │
//! ├─────────────────────────────────────────┤
//! │  RegionIndex cache  ←  scan_regions     │
//! └──────┬───────────┬──────────────┬───────┘
//!        ↓           ↓              ↓
//! ┌────────────┐ ┌──────────┐ ┌──────────────┐
//! │  quotes /  │ │  calls   │ │    interp    │
//! │   scan     │ │ resolver │ │   analyzer   │
//! └────────────┘ └──────────┘ └──────────────┘
//! ```
//!
//! Everything is synchronous and pure; the only state is the region cache,
//! invalidated by the host on every edit. Structural ambiguity
//! (unterminated strings, unmatched parens, half-typed interpolations)
//! never raises an error: scans degrade to "no region" so a user
//! mid-keystroke sees, at worst, no completions.
//!
//! ## Example
//!
//! ```rust
//! use r_sql_islands::{DetectorConfig, Position, SqlIslandDetector};
//!
//! let mut detector = SqlIslandDetector::new(DetectorConfig::default()).unwrap();
//! let text = r#"dbGetQuery(con, "SELECT 1")"#;
//!
//! let result = detector.classify("file:///query.R", 1, text, Position::new(0, 20));
//! assert!(result.is_embedded_sql());
//! ```

pub mod cache;
pub mod calls;
pub mod classify;
pub mod config;
pub mod interp;
pub mod line_index;
pub mod position;
pub mod quotes;
pub mod region;
pub mod scan;

// Re-exports for convenience
pub use cache::{DocumentCacheEntry, RegionIndex};
pub use calls::{CallContext, resolve_call_context};
pub use classify::{Classification, SqlIslandDetector};
pub use config::{CallNameSet, ConfigError, DetectorConfig};
pub use interp::{PLACEHOLDER, is_inside_interpolation, strip_interpolations};
pub use line_index::LineIndex;
pub use position::{Position, Range};
pub use quotes::string_content_range_at;
pub use region::{SqlRegion, scan_regions};
pub use scan::{find_matching_close, is_balanced, is_inside_parens};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
