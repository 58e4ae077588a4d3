//! bibdex: concurrent bibliographic record scraper for economics journal
//! index sites
//!
//! Reads the article listings of five academic-journal archives (AER, QJE,
//! JPE, EMA, RES), each with its own inconsistent HTML layout, and extracts
//! one normalized record per article: abstract, JEL subject-classification
//! codes, and a citation string. One pipeline runs per journal in parallel;
//! all pipelines feed a single append-only JSONL sink through a dedicated
//! writer task.

pub mod config;
pub mod scraping;
pub mod sink;
pub mod types;

pub use config::Config;
pub use types::*;
