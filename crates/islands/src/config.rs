// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Detector configuration
//!
//! This module provides the options record consumed by the detector at
//! construction time.
//!
//! ## Configuration Structure
//!
//! The configuration includes:
//! - The set of SQL-bearing call names (direct, interpolated, and the
//!   named-argument allowlist)
//! - Resource bounds that keep every per-keystroke scan cheap
//! - Cache expiry for the region index
//!
//! Call names are data, not behavior: the host application can extend the
//! recognized set without touching scanning logic.
//!
//! ## Example
//!
//! ```rust,ignore
//! use r_sql_islands::{CallNameSet, DetectorConfig};
//!
//! let config = DetectorConfig {
//!     context_line_lookback: 10,
//!     call_names: CallNameSet::r_defaults(),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Settings section key in the LSP client configuration payload
const SETTINGS_SECTION: &str = "rSqlIslands";

/// SQL-bearing call names, partitioned by argument semantics
///
/// *Direct* calls take a SQL string verbatim (`dbGetQuery`). *Interpolated*
/// calls take SQL with `{...}` host-language placeholders (`glue_sql`). The
/// allowlist names the parameters of direct calls that still carry SQL when
/// passed by name (`sqlInterpolate(con, sql = "...")`); every other named
/// argument is never SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallNameSet {
    /// Calls whose positional string argument is SQL verbatim
    pub direct: Vec<String>,

    /// Calls whose string argument is SQL with `{...}` interpolation
    pub interpolated: Vec<String>,

    /// Named parameters of direct calls that still count as SQL
    pub named_arg_allowlist: HashMap<String, Vec<String>>,
}

impl CallNameSet {
    /// The stock DBI / glue call names for R
    pub fn r_defaults() -> Self {
        let direct = [
            "dbGetQuery",
            "dbExecute",
            "dbSendQuery",
            "dbSendStatement",
            "sqlInterpolate",
        ];
        let interpolated = ["glue_sql", "glue_data_sql"];

        let mut named_arg_allowlist = HashMap::new();
        named_arg_allowlist.insert("sqlInterpolate".to_string(), vec!["sql".to_string()]);
        for call in ["dbGetQuery", "dbExecute", "dbSendQuery", "dbSendStatement"] {
            named_arg_allowlist.insert(call.to_string(), vec!["statement".to_string()]);
        }

        Self {
            direct: direct.iter().map(|s| s.to_string()).collect(),
            interpolated: interpolated.iter().map(|s| s.to_string()).collect(),
            named_arg_allowlist,
        }
    }

    /// All call names with their interpolation flag
    ///
    /// Iteration order is the tie-break order for overlapping matches:
    /// direct names first, then interpolated names, each in declaration
    /// order. The order is deterministic and part of the contract.
    pub fn iter_names(&self) -> impl Iterator<Item = (&str, bool)> {
        self.direct
            .iter()
            .map(|n| (n.as_str(), false))
            .chain(self.interpolated.iter().map(|n| (n.as_str(), true)))
    }

    /// Whether `name` is one of the interpolated-SQL calls
    pub fn is_interpolated(&self, name: &str) -> bool {
        self.interpolated.iter().any(|n| n == name)
    }

    /// Whether the named parameter `param` of `call` still carries SQL
    pub fn allows_named_arg(&self, call: &str, param: &str) -> bool {
        self.named_arg_allowlist
            .get(call)
            .is_some_and(|params| params.iter().any(|p| p == param))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.direct.is_empty() && self.interpolated.is_empty() {
            return Err(ConfigError::EmptyCallNameSet);
        }

        for name in self.direct.iter().chain(self.interpolated.iter()) {
            if !is_valid_call_name(name) {
                return Err(ConfigError::InvalidCallName { name: name.clone() });
            }
        }

        // Allowlist entries for undeclared calls are inert, not errors:
        // client settings may override the call lists while the default
        // allowlist is still merged in.
        Ok(())
    }
}

impl Default for CallNameSet {
    fn default() -> Self {
        Self::r_defaults()
    }
}

/// Whether `c` can appear in an R identifier
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

fn is_valid_call_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '.' => {}
        _ => return false,
    }
    chars.all(is_ident_char)
}

/// Main detector configuration
///
/// All limits must be positive; [`DetectorConfig::validate`] rejects a
/// malformed record eagerly so scan-time code never has to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorConfig {
    /// Maximum document size in bytes; larger documents are not scanned
    /// and report no regions
    pub max_document_size: usize,

    /// Maximum call-name occurrences considered per scan
    pub max_function_matches: usize,

    /// Maximum distance (chars) between a call name and its opening paren
    pub max_paren_search_distance: usize,

    /// Maximum length (chars) searched for a call's closing paren
    pub max_function_call_length: usize,

    /// How many lines above a string literal the call name may start
    pub context_line_lookback: usize,

    /// Backward character budget for named-argument detection
    pub named_arg_lookback: usize,

    /// Region cache time-to-live in milliseconds
    pub cache_expiry_ms: u64,

    /// The recognized SQL-bearing call names
    pub call_names: CallNameSet,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_document_size: 1_048_576,
            max_function_matches: 256,
            max_paren_search_distance: 256,
            max_function_call_length: 16_384,
            context_line_lookback: 20,
            named_arg_lookback: 80,
            cache_expiry_ms: 30_000,
            call_names: CallNameSet::default(),
        }
    }
}

impl DetectorConfig {
    /// Validate the configuration
    ///
    /// Checks that every limit is positive and the call-name set is
    /// well-formed. Called by the detector constructor; a config that fails
    /// here is rejected before any scanning happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("maxDocumentSize", self.max_document_size),
            ("maxFunctionMatches", self.max_function_matches),
            ("maxParenSearchDistance", self.max_paren_search_distance),
            ("maxFunctionCallLength", self.max_function_call_length),
            ("contextLineLookback", self.context_line_lookback),
            ("namedArgLookback", self.named_arg_lookback),
            ("cacheExpiryMs", self.cache_expiry_ms as usize),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidLimit { field });
            }
        }

        self.call_names.validate()
    }

    /// Cache time-to-live as a [`Duration`]
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_millis(self.cache_expiry_ms)
    }

    /// Parse detector config from an LSP client settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "rSqlIslands": {
    ///     "contextLineLookback": 20,
    ///     "callNames": { "direct": [...], "interpolated": [...] }
    ///   }
    /// }
    ///
    /// Absent fields fall back to defaults. Returns None when the section
    /// is missing, malformed, or fails validation.
    pub fn from_lsp_settings(settings: &Value) -> Option<Self> {
        let section = settings.get(SETTINGS_SECTION)?;
        let config: Self = serde_json::from_value(section.clone()).ok()?;
        config.validate().ok()?;
        Some(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No call names configured at all
    #[error("Call name set must declare at least one call")]
    EmptyCallNameSet,

    /// A call name that is not a valid R identifier
    #[error("Invalid call name: {name:?}")]
    InvalidCallName { name: String },

    /// A resource limit set to zero
    #[error("Configuration limit {field} must be > 0")]
    InvalidLimit { field: &'static str },
}
