// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Region index
//!
//! Pure memoization of scan results, one entry per open document. The index
//! holds no scanning logic; its contract is the invalidation discipline: a
//! stale entry (older version token, or past its time-to-live) is never
//! served, and edits or closes purge entries immediately.
//!
//! The index is an explicit object owned by the detector, constructed with
//! configuration and torn down with it. It is not a process-wide singleton;
//! multi-threaded hosts wrap the owning detector in their own lock.

use crate::region::SqlRegion;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cached scan result for one document version
#[derive(Debug, Clone)]
pub struct DocumentCacheEntry {
    /// Version token of the text that produced the regions
    version: i32,

    /// Ordered region sequence; shared read-only with callers
    regions: Arc<Vec<SqlRegion>>,

    /// When the entry was created, for TTL expiry
    created_at: Instant,
}

/// Version + TTL keyed memoization of per-document region scans
#[derive(Debug)]
pub struct RegionIndex {
    entries: HashMap<String, DocumentCacheEntry>,
    expiry: Duration,
}

impl RegionIndex {
    /// Create an empty index with the given entry time-to-live
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            expiry,
        }
    }

    /// Look up the cached regions for `key` at `version`
    ///
    /// Misses on an unknown document, a different version token, or an
    /// entry past its time-to-live. Never returns stale data.
    pub fn get(&self, key: &str, version: i32) -> Option<Arc<Vec<SqlRegion>>> {
        let entry = self.entries.get(key)?;
        if entry.version != version {
            return None;
        }
        if entry.created_at.elapsed() >= self.expiry {
            debug!("Cache entry for {} expired", key);
            return None;
        }
        Some(Arc::clone(&entry.regions))
    }

    /// Store freshly scanned regions for `key` at `version`
    pub fn update(&mut self, key: &str, version: i32, regions: Vec<SqlRegion>) -> Arc<Vec<SqlRegion>> {
        let regions = Arc::new(regions);
        self.entries.insert(
            key.to_string(),
            DocumentCacheEntry {
                version,
                regions: Arc::clone(&regions),
                created_at: Instant::now(),
            },
        );
        regions
    }

    /// Drop the entry for `key` (document edited or closed)
    pub fn invalidate(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!("Invalidated cached regions for {}", key);
        }
    }

    /// Drop every entry
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Number of cached documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
