use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.voyageai.com/v1";
pub const API_KEY_ENV: &str = "VOYAGE_API_KEY";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Falls back to `VOYAGE_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Bounds a single attempt's round trip. Unbounded when `None`.
    pub timeout: Option<Duration>,
    /// Total attempts per call; `0` behaves like `1`.
    pub max_retries: usize,
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: None,
            max_retries: 1,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Explicit key first, then the environment. An empty token is allowed;
    /// the API rejects it with 401.
    pub fn resolve_api_key(&self) -> String {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve_api_key`](Self::resolve_api_key) with the
    /// environment lookup supplied by the caller.
    pub fn resolve_api_key_with(&self, lookup: impl FnOnce(&str) -> Option<String>) -> String {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => lookup(API_KEY_ENV).unwrap_or_default(),
        }
    }

    pub const fn attempt_budget(&self) -> usize {
        if self.max_retries == 0 {
            1
        } else {
            self.max_retries
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
