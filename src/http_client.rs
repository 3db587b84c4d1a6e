// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Client
 * Size-capped, timeout-bounded fetches for the exposure checks
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Realistic browser User-Agents to avoid detection
const BROWSER_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Get a realistic browser User-Agent (rotates to avoid blocks)
fn get_browser_user_agent() -> &'static str {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let index = COUNTER.fetch_add(1, Ordering::Relaxed) % BROWSER_USER_AGENTS.len();
    BROWSER_USER_AGENTS[index]
}

/// Default maximum response body size (5MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// A fetched response. Status is never auto-rejected here; the caller
/// inspects it per its own semantics (a probe may require 200 to evaluate
/// content, a link auditor treats >=400 as the signal itself).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn contains(&self, pattern: &str) -> bool {
        self.body.contains(pattern)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_lowercase()).cloned()
    }
}

/// Outcome of a single fetch. Failure is data, not an error: every job gets
/// an outcome, and the check decides whether a failure is benign or
/// reportable.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success(HttpResponse),
    Timeout,
    NetworkError(String),
    InvalidUrl(String),
    Cancelled,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            FetchOutcome::Success(response) => Some(response),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(get_browser_user_agent())
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        })
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Fetch a URL once with the given per-request deadline.
    ///
    /// Exactly one attempt per call: a timed-out or refused fetch is an
    /// outcome for the caller to interpret, never an automatic retry.
    pub async fn fetch(&self, url: &str, timeout: Duration, max_bytes: usize) -> FetchOutcome {
        if reqwest::Url::parse(url).is_err() {
            return FetchOutcome::InvalidUrl(url.to_string());
        }

        let cap = max_bytes.min(self.max_body_size);

        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();

                let headers = {
                    let raw = response.headers();
                    let mut map = HashMap::with_capacity(raw.len());
                    for (k, v) in raw.iter() {
                        if let Ok(value_str) = v.to_str() {
                            map.insert(k.as_str().to_string(), value_str.to_string());
                        }
                    }
                    map
                };

                let body_bytes = response.bytes().await.unwrap_or_default();
                let body = if body_bytes.len() > cap {
                    // Truncate oversized responses
                    String::from_utf8_lossy(&body_bytes[..cap]).to_string()
                } else {
                    String::from_utf8_lossy(&body_bytes).to_string()
                };

                FetchOutcome::Success(HttpResponse {
                    status_code,
                    headers,
                    body,
                })
            }
            Err(e) => {
                debug!("Fetch failed for {}: {}", url, e);
                if e.is_timeout() {
                    FetchOutcome::Timeout
                } else {
                    FetchOutcome::NetworkError(e.to_string())
                }
            }
        }
    }
}
