//! Background parsing with a progress stream.
//!
//! [`spawn_parse`] moves a transcript onto Tokio's blocking pool and returns
//! a [`ParseHandle`]. The handle yields zero or more [`ProgressSnapshot`]s
//! followed by exactly one [`ParseOutcome`]. The scan shares nothing with the
//! caller: the text goes in by value and results come back over channels.
//!
//! # Example
//!
//! ```rust
//! use chatlog::parser::TranscriptParser;
//! use chatlog::worker::spawn_parse;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> chatlog::Result<()> {
//! let text = "1/2/23, 9:41 AM - Alice: Hello there".to_string();
//! let mut handle = spawn_parse(TranscriptParser::new(), text, "_chat.txt".into());
//!
//! while let Some(snapshot) = handle.next_progress().await {
//!     println!("{}%", snapshot.percent);
//! }
//!
//! let chat = handle.outcome().await?.into_result()?;
//! assert_eq!(chat.messages.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::chat::ParseOutcome;
use crate::error::{ChatlogError, Result};
use crate::parser::TranscriptParser;
use crate::progress::{ProgressCallback, ProgressSnapshot};

/// Shared flag asking a background parse to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not yet cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Caller's side of a background parse.
///
/// Dropping the handle abandons the run: the scan notices at its next line
/// and exits without producing an outcome.
#[derive(Debug)]
pub struct ParseHandle {
    progress: mpsc::UnboundedReceiver<ProgressSnapshot>,
    outcome: oneshot::Receiver<ParseOutcome>,
    cancel: CancelToken,
}

impl ParseHandle {
    /// Waits for the next progress snapshot.
    ///
    /// Returns `None` once the scan has finished or stopped and every
    /// snapshot has been delivered.
    pub async fn next_progress(&mut self) -> Option<ProgressSnapshot> {
        self.progress.recv().await
    }

    /// Waits for the terminal outcome, discarding undelivered snapshots.
    ///
    /// Fails with [`ChatlogError::Cancelled`] if the run was cancelled before
    /// finishing.
    pub async fn outcome(self) -> Result<ParseOutcome> {
        let Self {
            progress,
            outcome,
            cancel,
        } = self;
        drop(progress);

        outcome.await.map_err(|_| {
            if cancel.is_cancelled() {
                ChatlogError::Cancelled
            } else {
                ChatlogError::Worker("parse task ended without an outcome".to_string())
            }
        })
    }

    /// Delivers every snapshot to `on_progress`, then waits for the outcome.
    pub async fn wait(mut self, mut on_progress: impl FnMut(ProgressSnapshot)) -> Result<ParseOutcome> {
        while let Some(snapshot) = self.progress.recv().await {
            on_progress(snapshot);
        }
        self.outcome().await
    }

    /// Requests cancellation of the run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a token that can cancel this run from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

/// Starts parsing `text` on the blocking pool.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_parse(parser: TranscriptParser, text: String, file_name: String) -> ParseHandle {
    spawn_parse_with_cancel(parser, text, file_name, CancelToken::new())
}

/// Starts parsing `text` on the blocking pool, observing an existing token.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_parse_with_cancel(
    parser: TranscriptParser,
    text: String,
    file_name: String,
    cancel: CancelToken,
) -> ParseHandle {
    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (outcome_tx, outcome_rx) = oneshot::channel();
    let token = cancel.clone();

    tokio::task::spawn_blocking(move || {
        let callback: ProgressCallback = Arc::new(move |snapshot| {
            // A dropped receiver only means nobody is watching progress.
            let _ = progress_tx.send(snapshot);
        });
        let should_stop = || token.is_cancelled() || outcome_tx.is_closed();

        match parser.parse_cancellable(&text, &file_name, &callback, &should_stop) {
            Some(outcome) => {
                if outcome_tx.send(outcome).is_err() {
                    debug!(file_name = %file_name, "parse outcome discarded, handle dropped");
                }
            }
            None => debug!(file_name = %file_name, "background parse stopped"),
        }
    });

    ParseHandle {
        progress: progress_rx,
        outcome: outcome_rx,
        cancel,
    }
}
