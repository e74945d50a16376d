//! Configuration options for the Datakura client

use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration options for the Datakura client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Server origin, e.g. `https://wms.example.com`
    pub base_url: String,

    /// Path prefix of the REST API
    pub api_prefix: String,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Upper bound for the best-effort logout call
    pub logout_timeout: Duration,

    /// Storage key of the cached user profile
    pub user_storage_key: String,

    /// Storage key of the refresh token
    pub refresh_token_storage_key: String,

    /// Header carrying the anti-forgery token
    pub csrf_header: String,

    /// Cookie the server keeps the anti-forgery token in
    pub csrf_cookie: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            logout_timeout: Duration::from_secs(5),
            user_storage_key: "session-user".to_string(),
            refresh_token_storage_key: "refresh-token".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            csrf_cookie: crate::csrf::DEFAULT_COOKIE.to_string(),
        }
    }
}

impl ClientOptions {
    /// Options pointing at the given server origin
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Build options from `DATAKURA_URL`, `DATAKURA_API_PREFIX` and `DATAKURA_TIMEOUT_SECS`.
    ///
    /// Only `DATAKURA_URL` is required.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DATAKURA_URL").map_err(|_| {
            Error::config("DATAKURA_URL environment variable not found")
        })?;
        let mut options = Self::new(&base_url);

        if let Ok(prefix) = std::env::var("DATAKURA_API_PREFIX") {
            options = options.with_api_prefix(&prefix);
        }

        if let Ok(secs) = std::env::var("DATAKURA_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::config(format!("invalid DATAKURA_TIMEOUT_SECS: {}", secs)))?;
            options = options.with_request_timeout(Some(Duration::from_secs(secs)));
        }

        Ok(options)
    }

    /// Full URL of an API endpoint, e.g. `endpoint("auth/login")`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Set the server origin
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.to_string();
        self
    }

    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the logout timeout
    pub fn with_logout_timeout(mut self, value: Duration) -> Self {
        self.logout_timeout = value;
        self
    }

    /// Set the storage key of the cached user
    pub fn with_user_storage_key(mut self, value: &str) -> Self {
        self.user_storage_key = value.to_string();
        self
    }

    /// Set the storage key of the refresh token
    pub fn with_refresh_token_storage_key(mut self, value: &str) -> Self {
        self.refresh_token_storage_key = value.to_string();
        self
    }

    /// Set the anti-forgery header name
    pub fn with_csrf_header(mut self, value: &str) -> Self {
        self.csrf_header = value.to_string();
        self
    }

    pub fn with_csrf_cookie(mut self, value: &str) -> Self {
        self.csrf_cookie = value.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let options = ClientOptions::new("http://wms.local/");
        assert_eq!(
            options.endpoint("auth/login"),
            "http://wms.local/api/v1/auth/login"
        );

        let options = options.with_api_prefix("api/v2/");
        assert_eq!(
            options.endpoint("/auth/whoami"),
            "http://wms.local/api/v2/auth/whoami"
        );
    }
}
