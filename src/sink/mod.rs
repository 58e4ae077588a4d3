//! Record sink
//!
//! A single writer owns the output file exclusively; every journal pipeline
//! sends completed records over a channel instead of sharing the handle.
//! Records are written as one compact JSON object per line, flushed as they
//! arrive — no batching, no rotation. Re-running appends.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::types::Record;

/// Channel capacity between pipelines and the writer
const SINK_CHANNEL_CAPACITY: usize = 1024;

/// Errors from the record sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record sink closed")]
    Closed,
}

/// Cloneable sending half handed to each journal pipeline
#[derive(Clone)]
pub struct RecordWriter {
    tx: mpsc::Sender<Record>,
}

impl RecordWriter {
    /// Send one record to the sink worker.
    pub async fn write(&self, record: Record) -> Result<(), SinkError> {
        self.tx.send(record).await.map_err(|_| SinkError::Closed)
    }
}

/// Append-only JSONL record sink with a dedicated writer task
pub struct RecordSink {
    tx: mpsc::Sender<Record>,
    worker: JoinHandle<Result<u64, SinkError>>,
}

impl RecordSink {
    /// Open `path` in create-or-append mode and start the writer task.
    pub fn start(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (tx, rx) = mpsc::channel(SINK_CHANNEL_CAPACITY);

        info!("Record sink writing to {}", path.display());

        let worker = tokio::spawn(run_writer(file, rx));

        Ok(Self { tx, worker })
    }

    /// A new sending handle for a pipeline.
    pub fn writer(&self) -> RecordWriter {
        RecordWriter {
            tx: self.tx.clone(),
        }
    }

    /// Close the channel and wait for the writer to drain, returning the
    /// number of records written.
    ///
    /// All `RecordWriter` clones must be dropped by their pipelines before
    /// this resolves; the sink's own sender is dropped here.
    pub async fn finish(self) -> Result<u64, SinkError> {
        drop(self.tx);
        match self.worker.await {
            Ok(result) => result,
            Err(_) => Err(SinkError::Closed),
        }
    }
}

/// Writer loop: owns the file, serializes and appends each record.
async fn run_writer(
    file: std::fs::File,
    mut rx: mpsc::Receiver<Record>,
) -> Result<u64, SinkError> {
    let mut out = BufWriter::new(file);
    let mut written: u64 = 0;

    while let Some(record) = rx.recv().await {
        let line = serde_json::to_string(&record)?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        written += 1;
        debug!("Wrote record {} ({})", record.url, record.journal);
    }

    info!("Record sink closed after {} records", written);
    Ok(written)
}
