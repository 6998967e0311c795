// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # r-sql-islands-lsp
//!
//! LSP server exposing embedded-SQL detection for R scripts.
//!
//! ## Overview
//!
//! The server watches open R documents and:
//! - Detects SQL string literals passed to database calls
//! - Offers SQL keyword completion inside those literals
//! - Warns about unbalanced parentheses in embedded queries
//! - Highlights detected regions for the editor
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Client (VS Code, etc.)          │
//! └──────────────┬──────────────────────────┘
//!                │ LSP Protocol
//!                ↓
//! ┌─────────────────────────────────────────┐
//! │       Island Backend (tower-lsp)        │
//! ├─────────────────────────────────────────┤
//! │  • did_open / did_change / did_close    │
//! │  • completion / highlight / diagnostics │
//! └──────┬───────────────────┬──────────────┘
//!        ↓                   ↓
//! ┌────────────┐    ┌──────────────────┐
//! │  Document  │    │ SqlIslandDetector│
//! │   Store    │    │  (r-sql-islands) │
//! └────────────┘    └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! Starting the LSP server requires setting up tower-lsp with stdio
//! transport:
//!
//! ```rust,no_run
//! use r_sql_islands_lsp::IslandBackend;
//! use tower_lsp::{LspService, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let stdin = tokio::io::stdin();
//!     let stdout = tokio::io::stdout();
//!
//!     let (service, socket) = LspService::new(IslandBackend::new);
//!     Server::new(stdin, stdout, socket).serve(service).await;
//! }
//! ```
//!
//! ## Configuration
//!
//! The detector is configured through client settings:
//!
//! ```json
//! {
//!   "rSqlIslands": {
//!     "contextLineLookback": 20,
//!     "callNames": {
//!       "direct": ["dbGetQuery", "dbExecute"],
//!       "interpolated": ["glue_sql"]
//!     }
//!   }
//! }
//! ```
//!
//! Invalid settings are rejected as a whole; the server keeps running
//! with the previous configuration.
//!
//! ## Modules
//!
//! - [`backend`]: Main LSP server implementation
//! - [`document`]: Document management and storage
//! - [`completion`]: SQL keyword completion
//! - [`diagnostic`]: Structural checks over detected regions

pub mod backend;
pub mod completion;
pub mod convert;
pub mod diagnostic;
pub mod document;

// Re-exports for convenience
pub use backend::IslandBackend;
pub use completion::{SQL_KEYWORDS, keyword_completions};
pub use diagnostic::{DiagnosticCode, collect_diagnostics};
pub use document::{Document, DocumentError, DocumentStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name
pub const SERVER_NAME: &str = "r-sql-islands";
