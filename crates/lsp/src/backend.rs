// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend Implementation
//!
//! This module provides the main LSP server backend using tower-lsp.
//!
//! ## Overview
//!
//! The backend handles:
//! - LSP protocol communication via tower-lsp
//! - Document lifecycle (open, change, close)
//! - Detector configuration management
//! - Completion, diagnostics and highlights for embedded SQL
//!
//! ## Architecture
//!
//! ```text
//! Client → LSP Backend → Document Store
//!                ↓
//!         SqlIslandDetector
//!                ↓
//!     Completion / Diagnostics / Highlights
//! ```
//!
//! Every request funnels through the detector's region cache, which is
//! invalidated on each edit. Classification never fails, so handlers
//! degrade to "no result" rather than surfacing errors mid-keystroke.

use crate::completion::keyword_completions;
use crate::convert::{to_core_position, to_lsp_range};
use crate::diagnostic::collect_diagnostics;
use crate::document::{DocumentError, DocumentStore};
use r_sql_islands::{Classification, DetectorConfig, SqlIslandDetector};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};

/// LSP backend implementation
///
/// Main entry point for all LSP protocol operations.
/// Uses tower-lsp framework for protocol handling.
pub struct IslandBackend {
    /// LSP client for sending notifications and requests
    client: Client,

    /// Document store for managing open documents
    documents: Arc<DocumentStore>,

    /// Embedded-SQL detector with its region cache
    detector: Arc<RwLock<SqlIslandDetector>>,
}

impl IslandBackend {
    /// Create a new LSP backend with the default detector configuration
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            detector: Arc::new(RwLock::new(SqlIslandDetector::default())),
        }
    }

    /// Get the document store
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Log a message to the client
    async fn log_message(&self, message: &str, message_type: MessageType) {
        self.client.log_message(message_type, message).await;
    }

    /// Re-scan a document and publish its diagnostics
    ///
    /// Called after open and after every change. Publishing an empty list
    /// clears stale diagnostics on the client side.
    async fn refresh_diagnostics(&self, uri: &Url) {
        let Some(document) = self.documents.get_document(uri).await else {
            return;
        };

        let content = document.get_content();
        let regions = {
            let mut detector = self.detector.write().await;
            detector.regions(uri.as_str(), document.version(), &content)
        };

        let diagnostics = collect_diagnostics(&regions);
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(document.version()))
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for IslandBackend {
    /// Initialize the LSP server
    ///
    /// Called when the client starts the server.
    /// Returns server capabilities and configuration.
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Initializing LSP server");
        info!("Client info: {:?}", params.client_info);

        self.log_message("R SQL islands server initialized", MessageType::INFO)
            .await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Text synchronization
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),

                // SQL keyword completion inside embedded regions
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![" ".to_string(), ",".to_string()]),
                    work_done_progress_options: WorkDoneProgressOptions {
                        work_done_progress: Some(false),
                    },
                    all_commit_characters: None,
                    completion_item: None,
                }),

                // Highlight every detected SQL region
                document_highlight_provider: Some(OneOf::Left(true)),

                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: crate::SERVER_NAME.to_string(),
                version: Some(crate::VERSION.to_string()),
            }),
        })
    }

    /// Initialized notification
    ///
    /// Called after `initialize` completes successfully.
    async fn initialized(&self, _params: InitializedParams) {
        info!("LSP server initialized successfully");
    }

    /// Shutdown the LSP server
    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down LSP server");
        Ok(())
    }

    /// Document opened notification
    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.clone();

        info!(
            "Document opened: uri={}, language={}, version={}",
            uri, doc.language_id, doc.version
        );

        match self
            .documents
            .open_document(uri.clone(), doc.text, doc.version, doc.language_id)
            .await
        {
            Ok(()) => {
                self.refresh_diagnostics(&uri).await;
            }
            Err(e) => {
                error!("Failed to open document: {}", e);
            }
        }
    }

    /// Document changed notification
    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let identifier = params.text_document;
        let uri = identifier.uri.clone();
        let changes = params.content_changes;

        info!(
            "Document changed: uri={}, version={}, changes={}",
            uri,
            identifier.version,
            changes.len()
        );

        match self.documents.update_document(&identifier, &changes).await {
            Ok(()) => {
                // The cache is version-keyed; an explicit invalidate keeps
                // memory bounded when clients reuse versions.
                self.detector.write().await.invalidate(uri.as_str());
                self.refresh_diagnostics(&uri).await;
            }
            Err(DocumentError::DocumentNotFound(uri)) => {
                warn!("Document not found for change: {}", uri);
            }
            Err(e) => {
                error!("Failed to update document: {}", e);
            }
        }
    }

    /// Document closed notification
    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        info!("Document closed: uri={}", uri);

        if self.documents.close_document(&uri).await {
            self.detector.write().await.invalidate(uri.as_str());

            // Clear any published diagnostics for the closed document
            self.client
                .publish_diagnostics(uri.clone(), Vec::new(), None)
                .await;
        } else {
            warn!("Document not found for close: {}", uri);
        }
    }

    /// Configuration change notification
    ///
    /// Applies the `rSqlIslands` settings section. Invalid settings are
    /// rejected as a whole and the previous configuration stays active.
    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        info!("Configuration changed");

        match DetectorConfig::from_lsp_settings(&params.settings) {
            Some(config) => {
                let mut detector = self.detector.write().await;
                match detector.set_config(config) {
                    Ok(()) => info!("Detector configuration updated"),
                    Err(e) => warn!("Rejected detector configuration: {}", e),
                }
            }
            None => {
                warn!("No valid rSqlIslands settings section; keeping current configuration");
            }
        }
    }

    /// Completion request
    ///
    /// Offers SQL keywords when the cursor sits inside an embedded SQL
    /// region. Host interpolation code and plain R get nothing, leaving
    /// the editor's own R completion in charge.
    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(document) = self.documents.get_document(&uri).await else {
            warn!("Document not found for completion: {}", uri);
            return Ok(None);
        };

        let content = document.get_content();
        let result = {
            let mut detector = self.detector.write().await;
            detector.classify(
                uri.as_str(),
                document.version(),
                &content,
                to_core_position(position),
            )
        };

        match result {
            Classification::EmbeddedSql { region, .. } => {
                info!(
                    "Completion inside SQL region for {} at line {}",
                    region.call_name, position.line
                );
                Ok(Some(CompletionResponse::Array(keyword_completions())))
            }
            Classification::EmbeddedHost { .. } | Classification::NotEmbedded => Ok(None),
        }
    }

    /// Document highlight request
    ///
    /// Highlights every detected SQL region so editors can render the
    /// islands distinctly.
    async fn document_highlight(
        &self,
        params: DocumentHighlightParams,
    ) -> Result<Option<Vec<DocumentHighlight>>> {
        let uri = params.text_document_position_params.text_document.uri;

        let Some(document) = self.documents.get_document(&uri).await else {
            return Ok(None);
        };

        let content = document.get_content();
        let regions = {
            let mut detector = self.detector.write().await;
            detector.regions(uri.as_str(), document.version(), &content)
        };

        if regions.is_empty() {
            return Ok(None);
        }

        let highlights = regions
            .iter()
            .map(|region| DocumentHighlight {
                range: to_lsp_range(&region.range),
                kind: Some(DocumentHighlightKind::TEXT),
            })
            .collect();

        Ok(Some(highlights))
    }
}
