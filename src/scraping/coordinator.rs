//! Fan-out coordinator for the journal pipelines
//!
//! One task per configured journal: the task enumerates its index page,
//! then extracts every discovered article sequentially, sending each record
//! to the sink the moment it is complete. Journals run in parallel; records
//! from one journal arrive in link-discovery order, while interleaving
//! across journals is up to network latency. A failed pipeline is reported
//! in the run summary without disturbing its siblings.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use url::Url;

use crate::config::{Config, JournalConfig};
use crate::sink::{RecordSink, RecordWriter};
use crate::types::{JournalTag, LinkDirector};

use super::extractor::RecordExtractor;
use super::fetcher::FetchEngine;
use super::links::enumerate_links;
use super::ScrapeError;

/// Lifecycle of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    NotStarted,
    /// Running with this many journal tasks in flight
    Running(usize),
    Completed,
}

/// What one journal's pipeline accomplished
#[derive(Debug)]
pub struct JournalOutcome {
    /// Journal this pipeline was dispatched for
    pub tag: JournalTag,
    /// Article links discovered on the index page
    pub links_found: usize,
    /// Records successfully written to the sink
    pub records_written: u64,
    /// The error that stopped the pipeline, if any
    pub error: Option<ScrapeError>,
}

impl JournalOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of a full run, one outcome per configured journal
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<JournalOutcome>,
}

impl RunSummary {
    /// Total records written across all journals.
    pub fn records_written(&self) -> u64 {
        self.outcomes.iter().map(|o| o.records_written).sum()
    }

    /// True when every journal pipeline finished without error.
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(JournalOutcome::is_ok)
    }

    /// The outcomes that carry an error.
    pub fn failures(&self) -> impl Iterator<Item = &JournalOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }
}

/// Coordinator owning the shared fetch engine and extractor
pub struct ScrapeCoordinator {
    fetcher: Arc<FetchEngine>,
    extractor: Arc<RecordExtractor>,
    journals: Vec<JournalConfig>,
    state: Arc<RwLock<CoordinatorState>>,
}

impl ScrapeCoordinator {
    /// Create a coordinator from the run configuration.
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let fetcher = FetchEngine::new(config.fetch.to_fetch_config())
            .map_err(ScrapeError::Client)?;
        let extractor = RecordExtractor::new()?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(extractor),
            journals: config.journals.clone(),
            state: Arc::new(RwLock::new(CoordinatorState::NotStarted)),
        })
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> CoordinatorState {
        *self.state.read().await
    }

    /// Run every journal pipeline to completion and summarize.
    ///
    /// Returns only after all tasks have finished; the caller still owns
    /// the sink and decides when to close it.
    pub async fn run(&self, sink: &RecordSink) -> RunSummary {
        {
            let mut state = self.state.write().await;
            *state = CoordinatorState::Running(self.journals.len());
        }

        info!("Starting scrape of {} journals", self.journals.len());

        let mut handles = Vec::with_capacity(self.journals.len());
        for journal in self.journals.clone() {
            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);
            let writer = sink.writer();
            let tag = journal.tag;
            let handle = tokio::spawn(scrape_journal(fetcher, extractor, journal, writer));
            handles.push((tag, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (tag, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!("{} pipeline task aborted: {}", tag, e);
                    outcomes.push(JournalOutcome {
                        tag,
                        links_found: 0,
                        records_written: 0,
                        error: Some(ScrapeError::Task(e.to_string())),
                    });
                }
            }
        }

        {
            let mut state = self.state.write().await;
            *state = CoordinatorState::Completed;
        }

        let summary = RunSummary { outcomes };
        info!(
            "Scrape finished: {} records written, {} journal(s) failed",
            summary.records_written(),
            summary.failures().count()
        );
        summary
    }

    /// Enumerate link directors for every configured journal without
    /// extracting records. Sequential; the first index fetch failure is
    /// fatal for the whole enumeration.
    pub async fn collect_links(&self) -> Result<Vec<LinkDirector>, ScrapeError> {
        let mut all = Vec::new();
        for journal in &self.journals {
            let index_url = parse_index_url(journal)?;
            let html = self.fetcher.fetch_page(&index_url).await.map_err(|source| {
                ScrapeError::Fetch {
                    url: index_url.to_string(),
                    source,
                }
            })?;
            let links = enumerate_links(&html, journal.tag);
            info!("{}: {} articles discovered", journal.tag, links.len());
            all.extend(links);
        }
        Ok(all)
    }
}

fn parse_index_url(journal: &JournalConfig) -> Result<Url, ScrapeError> {
    Url::parse(&journal.index_url).map_err(|source| ScrapeError::InvalidIndexUrl {
        url: journal.index_url.clone(),
        source,
    })
}

/// One journal's pipeline, reporting its outcome instead of propagating.
async fn scrape_journal(
    fetcher: Arc<FetchEngine>,
    extractor: Arc<RecordExtractor>,
    journal: JournalConfig,
    writer: RecordWriter,
) -> JournalOutcome {
    let mut outcome = JournalOutcome {
        tag: journal.tag,
        links_found: 0,
        records_written: 0,
        error: None,
    };

    if let Err(e) = scrape_journal_inner(&fetcher, &extractor, &journal, &writer, &mut outcome).await
    {
        error!("{} pipeline failed: {}", journal.tag, e);
        outcome.error = Some(e);
    }

    outcome
}

async fn scrape_journal_inner(
    fetcher: &FetchEngine,
    extractor: &RecordExtractor,
    journal: &JournalConfig,
    writer: &RecordWriter,
    outcome: &mut JournalOutcome,
) -> Result<(), ScrapeError> {
    let index_url = parse_index_url(journal)?;

    info!("{}: reading index {}", journal.tag, index_url);
    let html = fetcher
        .fetch_page(&index_url)
        .await
        .map_err(|source| ScrapeError::Fetch {
            url: index_url.to_string(),
            source,
        })?;

    let links = enumerate_links(&html, journal.tag);
    outcome.links_found = links.len();
    info!("{}: {} articles discovered", journal.tag, links.len());

    for director in links {
        let article_url =
            index_url
                .join(&director.url)
                .map_err(|source| ScrapeError::BadLink {
                    href: director.url.clone(),
                    base: index_url.to_string(),
                    source,
                })?;

        debug!("{}: extracting {}", journal.tag, article_url);
        let record = extractor
            .extract_record(fetcher, director.journal, &article_url)
            .await?;
        writer.write(record).await?;
        outcome.records_written += 1;
    }

    Ok(())
}
