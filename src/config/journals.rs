//! Journal roster and HTTP fetch configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::scraping::fetcher::FetchConfig;
use crate::types::JournalTag;

use super::DEFAULT_USER_AGENT;

/// One journal to scrape: its tag and the index page listing its articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Journal tag stamped onto every record from this pipeline
    pub tag: JournalTag,
    /// Index page URL; article hrefs are resolved against it
    pub index_url: String,
}

/// The five econpapers journal archives scraped by default
pub fn default_journals() -> Vec<JournalConfig> {
    [
        (JournalTag::Aer, "http://econpapers.repec.org/article/aeaaecrev/"),
        (JournalTag::Qje, "http://econpapers.repec.org/article/oupqjecon/"),
        (JournalTag::Jpe, "http://econpapers.repec.org/article/ucpjpolec/"),
        (JournalTag::Ema, "http://econpapers.repec.org/article/wlyemetrp/"),
        (JournalTag::Res, "http://econpapers.repec.org/article/ouprestud/"),
    ]
    .into_iter()
    .map(|(tag, index_url)| JournalConfig {
        tag,
        index_url: index_url.to_string(),
    })
    .collect()
}

/// HTTP fetch settings shared by every pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// User agent string
    pub user_agent: String,
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

impl FetchSettings {
    /// Convert the serialized settings into the fetch engine's runtime config
    pub fn to_fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_redirects: self.max_redirects,
        }
    }
}
