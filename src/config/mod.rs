//! Configuration for bibdex

mod journals;
mod logging;

pub use journals::{default_journals, FetchSettings, JournalConfig};
pub use logging::{LogFormat, LogLevel, LoggingConfig};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

/// Default user agent for all HTTP requests
pub const DEFAULT_USER_AGENT: &str = "bibdex/0.1 (bibliographic record scraper)";

/// Record sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Output file, opened in create-or-append mode; one JSON record per line
    pub path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("records.json"),
        }
    }
}

/// Main configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Record sink configuration
    #[serde(default)]
    pub sink: SinkConfig,
    /// HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchSettings,
    /// Journals to scrape, one parallel pipeline each
    #[serde(default = "default_journals")]
    pub journals: Vec<JournalConfig>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sink: SinkConfig::default(),
            fetch: FetchSettings::default(),
            journals: default_journals(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.journals.is_empty() {
            errors.push("at least one journal must be configured".to_string());
        }

        let mut seen = HashSet::new();
        for journal in &self.journals {
            if !seen.insert(journal.tag) {
                errors.push(format!("duplicate journal tag: {}", journal.tag));
            }
            match Url::parse(&journal.index_url) {
                Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
                Ok(url) => errors.push(format!(
                    "index URL for {} must be http(s), got scheme '{}'",
                    journal.tag,
                    url.scheme()
                )),
                Err(e) => errors.push(format!(
                    "invalid index URL for {}: {}",
                    journal.tag, e
                )),
            }
        }

        if self.fetch.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if self.fetch.connect_timeout_secs == 0 {
            errors.push("connect_timeout_secs must be positive".to_string());
        }
        if self.fetch.user_agent.is_empty() {
            errors.push("user_agent must not be empty".to_string());
        }

        if self.sink.path.as_os_str().is_empty() {
            errors.push("sink path must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JournalTag;

    fn valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn default_config_passes_validation() {
        let cfg = valid_config();
        assert!(cfg.validate().is_ok(), "default config should be valid");
    }

    #[test]
    fn default_config_covers_all_five_journals() {
        let cfg = valid_config();
        assert_eq!(cfg.journals.len(), 5);
        let tags: Vec<JournalTag> = cfg.journals.iter().map(|j| j.tag).collect();
        assert_eq!(
            tags,
            vec![
                JournalTag::Aer,
                JournalTag::Qje,
                JournalTag::Jpe,
                JournalTag::Ema,
                JournalTag::Res,
            ]
        );
    }

    #[test]
    fn validate_rejects_empty_journal_set() {
        let mut cfg = valid_config();
        cfg.journals.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("at least one journal"));
    }

    #[test]
    fn validate_rejects_duplicate_tags() {
        let mut cfg = valid_config();
        cfg.journals.push(JournalConfig {
            tag: JournalTag::Aer,
            index_url: "http://example.com/aer2/".to_string(),
        });
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate journal tag: AER"));
    }

    #[test]
    fn validate_rejects_malformed_index_url() {
        let mut cfg = valid_config();
        cfg.journals[0].index_url = "not a url".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid index URL for AER"));
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let mut cfg = valid_config();
        cfg.journals[0].index_url = "ftp://example.com/aer/".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("must be http(s)"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = valid_config();
        cfg.fetch.request_timeout_secs = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs must be positive"));
    }

    #[test]
    fn validate_collects_multiple_errors() {
        let mut cfg = valid_config();
        cfg.journals.clear();
        cfg.fetch.user_agent = String::new();
        cfg.sink.path = PathBuf::from("");
        let err = cfg.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("at least one journal"));
        assert!(msg.contains("user_agent must not be empty"));
        assert!(msg.contains("sink path must not be empty"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = valid_config();
        let toml_text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&toml_text).unwrap();
        assert_eq!(back.journals, cfg.journals);
        assert_eq!(back.sink.path, cfg.sink.path);
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.journals.len(), 5);
        assert_eq!(cfg.sink.path, PathBuf::from("records.json"));
        assert!(cfg.validate().is_ok());
    }
}
