//! Lazy virtual filesystem provider.
//!
//! Makes a declared set of files visible to the interpreter without fetching
//! their bytes up front. Entries come from a manifest of virtual path →
//! remote URL; a file's content is fetched on the first `open` and cached in
//! memory for the rest of the session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::BridgeError;
use crate::fetch::Fetcher;
use crate::Result;

/// A single manifest entry: a deferred fetch of one file's content.
#[derive(Debug, Clone)]
struct LazyFileEntry {
    /// Remote locator to fetch the content from.
    url: String,
    /// Cached content, populated on first open.
    content: Option<Arc<[u8]>>,
}

/// Lazily-populated virtual filesystem.
///
/// Manifest registration is only allowed before the mount table is finalized;
/// the loader finalizes it right before the interpreter payload runs, because
/// the payload's own filesystem initialization fixes the mount table.
pub struct LazyFs {
    fetcher: Arc<dyn Fetcher>,
    entries: Mutex<HashMap<String, LazyFileEntry>>,
    finalized: AtomicBool,
}

impl LazyFs {
    /// Create an empty filesystem that resolves entries through `fetcher`.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
            finalized: AtomicBool::new(false),
        }
    }

    /// Register a manifest of virtual path → remote URL.
    ///
    /// Fails with [`BridgeError::AlreadyInitialized`] once the mount table
    /// has been finalized. Registering the same path twice keeps the latest
    /// URL and drops any cached content for it.
    pub fn register(&self, manifest: HashMap<String, String>) -> Result<()> {
        if self.is_finalized() {
            return Err(BridgeError::AlreadyInitialized);
        }

        let mut entries = self.entries.lock().map_err(|_| BridgeError::LockPoisoned)?;
        for (path, url) in manifest {
            debug!(path = %path, url = %url, "lazy file registered");
            entries.insert(path, LazyFileEntry { url, content: None });
        }
        Ok(())
    }

    /// Finalize the mount table. No further registration is accepted.
    pub fn finalize(&self) {
        self.finalized.store(true, Ordering::SeqCst);
    }

    /// Whether the mount table has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::SeqCst)
    }

    /// Open a virtual path, fetching its content on first access.
    ///
    /// A failed fetch surfaces as [`BridgeError::ResourceUnavailable`]; the
    /// interpreter is expected to translate that into its normal I/O error
    /// channel rather than treat it as a worker fault. The entry stays
    /// unresolved, so a later open retries the fetch.
    pub fn open(&self, path: &str) -> Result<Arc<[u8]>> {
        // Resolve the URL without holding the lock across the fetch.
        let url = {
            let entries = self.entries.lock().map_err(|_| BridgeError::LockPoisoned)?;
            let entry = entries
                .get(path)
                .ok_or_else(|| BridgeError::FileNotFound(path.to_string()))?;
            if let Some(content) = &entry.content {
                return Ok(Arc::clone(content));
            }
            entry.url.clone()
        };

        debug!(path = %path, url = %url, "resolving lazy file");
        let bytes = self
            .fetcher
            .fetch(&url)
            .map_err(|e| BridgeError::ResourceUnavailable {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let content: Arc<[u8]> = bytes.into();
        let mut entries = self.entries.lock().map_err(|_| BridgeError::LockPoisoned)?;
        if let Some(entry) = entries.get_mut(path) {
            entry.content = Some(Arc::clone(&content));
        }
        Ok(content)
    }

    /// Whether a path is covered by the manifest.
    pub fn contains(&self, path: &str) -> bool {
        self.entries
            .lock()
            .map(|e| e.contains_key(path))
            .unwrap_or(false)
    }

    /// All registered virtual paths.
    pub fn paths(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }
}
