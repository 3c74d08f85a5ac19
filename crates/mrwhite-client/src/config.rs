//! Public configuration for the Mr. White API client.

use std::time::Duration;

use mrwhite_core::DEFAULT_API_BASE_URL;

/// Configuration for [`crate::MrWhiteApi`].
///
/// # Example
///
/// ```
/// use mrwhite_client::ApiClientConfig;
/// use std::time::Duration;
///
/// let config = ApiClientConfig::new("http://localhost:8000")
///     .with_token("secret")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Clone)]
pub struct ApiClientConfig {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
    pub(crate) user_agent: String,
    /// Applies to every request except the chat stream, whose lifetime is
    /// bounded only by the response itself.
    pub(crate) timeout: Duration,
    pub(crate) connect_timeout: Duration,
    pub(crate) max_retries: u8,
    pub(crate) retry_base_delay: Duration,
}

impl std::fmt::Debug for ApiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            user_agent: concat!("mrwhite-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(300),
        }
    }
}

impl ApiClientConfig {
    /// Configuration for the API at `base_url`, other settings default.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout. Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for `GET` requests. Defaults to 2.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff. Defaults to 300ms.
    #[must_use]
    pub const fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url(), DEFAULT_API_BASE_URL);
        assert!(config.token.is_none());
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn debug_redacts_token() {
        let config = ApiClientConfig::new("http://localhost").with_token("s3cret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
