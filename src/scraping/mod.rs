//! Scraping subsystem: per-journal pipelines feeding a shared record sink
//!
//! Key components:
//! - `FetchEngine`: pooled HTTP fetching of index, article, and full-text pages
//! - `enumerate_links`: article discovery on a journal's index page
//! - `RecordExtractor`: per-journal abstract/JEL/citation extraction
//! - `ScrapeCoordinator`: parallel fan-out, one pipeline per journal

pub mod coordinator;
pub mod extractor;
pub mod fetcher;
pub mod links;

pub use coordinator::{CoordinatorState, JournalOutcome, RunSummary, ScrapeCoordinator};
pub use extractor::RecordExtractor;
pub use fetcher::FetchEngine;
pub use links::enumerate_links;

use thiserror::Error;

use crate::sink::SinkError;
use extractor::ExtractError;
use fetcher::FetchError;

/// Fatal errors in a journal pipeline.
///
/// Only fetches and structural setup can fail; text-shape irregularities
/// are absorbed by the extraction heuristics and never surface here. An
/// error aborts the pipeline that hit it but leaves sibling journals
/// running.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] FetchError),
    #[error("invalid index URL {url:?}: {source}")]
    InvalidIndexUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot resolve article link {href:?} against {base}: {source}")]
    BadLink {
        href: String,
        base: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid full-text link {link:?}: {source}")]
    SecondaryLink {
        link: String,
        #[source]
        source: url::ParseError,
    },
    #[error("journal task failed: {0}")]
    Task(String),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
