//! HTTP fetch engine for journal pages
//!
//! A thin wrapper around a pooled `reqwest` client. The index sites serve
//! plain static HTML, so there is no rendering tier and no retry logic:
//! a failed fetch is fatal for the pipeline that issued it.

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during fetching
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid content type: {0}")]
    InvalidContentType(String),
}

/// Configuration for the fetch engine
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// HTTP fetch engine shared by all journal pipelines
pub struct FetchEngine {
    http_client: reqwest::Client,
}

impl FetchEngine {
    /// Create a new fetch engine
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self { http_client })
    }

    /// Fetch a page and return its body as HTML text.
    ///
    /// Only 2xx responses with an HTML-ish content type are accepted.
    pub async fn fetch_page(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.http_client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html")
            && !content_type.contains("application/xhtml")
            && !content_type.contains("text/plain")
        {
            return Err(FetchError::InvalidContentType(content_type));
        }

        let body = response.text().await?;
        Ok(body)
    }
}
