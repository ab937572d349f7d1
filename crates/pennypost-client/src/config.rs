//! Client configuration.

/// API base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Connection settings for [`crate::HttpApi`].
///
/// No request timeout is configured: calls wait as long as the transport
/// default allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    /// Configuration for the given base URL. Trailing slashes are trimmed.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Absolute URL for an endpoint path such as `/messages`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
