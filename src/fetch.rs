//! Remote resource fetching for the payload and lazy files.

use std::time::Duration;

/// Default per-request timeout for HTTP fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A blocking byte fetch against a remote locator.
///
/// The bridge performs at most a handful of fetches (one payload, one per
/// lazy file on first open), all from a context that is allowed to block, so
/// the trait is deliberately synchronous. The loader wraps its single payload
/// fetch in `spawn_blocking` to make that step an awaited suspension point.
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `url`.
    ///
    /// Returns the response body on a success status; any transport failure
    /// or non-2xx status is an error.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetch errors, kept separate from [`crate::BridgeError`] so call sites can
/// attach the path or payload context they have.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be completed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

/// HTTP fetcher backed by `reqwest`'s blocking client.
///
/// The blocking client drives its own internal runtime and panics when used
/// from async context, so each request runs on a dedicated thread that is
/// joined before returning.
pub struct HttpFetcher {
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Create a fetcher with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = url.to_string();
        let timeout = self.timeout;

        let handle = std::thread::spawn(move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let response = client
                .get(&url)
                .send()
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url,
                });
            }

            let body = response
                .bytes()
                .map_err(|e| FetchError::Transport(e.to_string()))?;
            Ok(body.to_vec())
        });

        handle
            .join()
            .map_err(|_| FetchError::Transport("fetch thread panicked".to_string()))?
    }
}
