//! Region index cache for open documents.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::{TextDocumentItem, Url};
use tracing::trace;

use crate::embedded::{DocumentRegions, RegionScanner};

/// Thread-safe store of scanned documents, keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    scanner: RegionScanner,
    documents: DashMap<Url, Arc<DocumentRegions>>,
}

impl DocumentStore {
    /// Create an empty store that scans with `scanner`.
    pub fn new(scanner: RegionScanner) -> Self {
        Self {
            scanner,
            documents: DashMap::new(),
        }
    }

    pub fn scanner(&self) -> &RegionScanner {
        &self.scanner
    }

    /// Scan a document and cache the result, replacing any previous version.
    pub fn open(&self, document: TextDocumentItem) -> Arc<DocumentRegions> {
        let uri = document.uri.clone();
        let regions = Arc::new(self.scanner.scan(document));
        self.documents.insert(uri, Arc::clone(&regions));
        regions
    }

    /// Cached regions for `document`, rescanning unless the cached entry has
    /// the same version.
    pub fn get_or_scan(&self, document: TextDocumentItem) -> Arc<DocumentRegions> {
        if let Some(cached) = self.get(&document.uri) {
            if cached.version() == document.version {
                trace!(uri = %document.uri, version = document.version, "region cache hit");
                return cached;
            }
        }
        self.open(document)
    }

    /// Get a document's regions.
    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentRegions>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
