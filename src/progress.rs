//! Progress reporting for long transcript scans.
//!
//! Progress is a side channel. Snapshots are pushed to a callback every
//! [`ParseConfig::progress_interval`](crate::config::ParseConfig::progress_interval)
//! lines, plus one final 100% snapshot right before the outcome is produced.
//! Nothing a callback does can change the parse result.
//!
//! # Example
//!
//! ```rust
//! use chatlog::progress::{ProgressCallback, ProgressSnapshot};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|snapshot: ProgressSnapshot| {
//!     println!("{}% ({} of {} lines)", snapshot.percent, snapshot.lines_processed, snapshot.total_lines);
//! });
//!
//! callback(ProgressSnapshot::new(1000, 4000));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Position of a scan at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Lines scanned so far.
    pub lines_processed: usize,

    /// Lines in the whole transcript.
    pub total_lines: usize,

    /// `lines_processed / total_lines`, rounded, 0-100.
    pub percent: u8,
}

impl ProgressSnapshot {
    /// Creates a snapshot, computing the rounded percentage.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatlog::progress::ProgressSnapshot;
    ///
    /// assert_eq!(ProgressSnapshot::new(2000, 3000).percent, 67);
    /// assert_eq!(ProgressSnapshot::new(0, 0).percent, 100);
    /// ```
    pub fn new(lines_processed: usize, total_lines: usize) -> Self {
        let percent = if total_lines == 0 {
            100
        } else {
            ((lines_processed as f64 / total_lines as f64) * 100.0)
                .round()
                .clamp(0.0, 100.0) as u8
        };
        Self {
            lines_processed,
            total_lines,
            percent,
        }
    }

    /// The snapshot that closes every scan.
    pub fn complete(total_lines: usize) -> Self {
        Self {
            lines_processed: total_lines,
            total_lines,
            percent: 100,
        }
    }

    /// Returns whether the scan is complete.
    pub fn is_complete(&self) -> bool {
        self.percent == 100 && self.lines_processed >= self.total_lines
    }
}

/// Callback type for receiving progress updates.
///
/// This is a thread-safe callback, so the same value can be handed to a
/// background parse.
pub type ProgressCallback = Arc<dyn Fn(ProgressSnapshot) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints to stderr.
///
/// This is useful for CLI applications that want simple progress output.
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|snapshot| {
        eprintln!(
            "Progress: {}% ({}/{} lines)",
            snapshot.percent, snapshot.lines_processed, snapshot.total_lines
        );
    })
}

/// Decides when a scan emits snapshots.
pub(crate) struct ProgressReporter<'a> {
    total_lines: usize,
    interval: usize,
    callback: &'a ProgressCallback,
}

impl<'a> ProgressReporter<'a> {
    pub(crate) fn new(total_lines: usize, interval: usize, callback: &'a ProgressCallback) -> Self {
        Self {
            total_lines,
            interval,
            callback,
        }
    }

    /// Called before line `index` is scanned; `index` lines are done.
    pub(crate) fn observe(&self, index: usize) {
        if self.interval > 0 && index > 0 && index % self.interval == 0 {
            (self.callback)(ProgressSnapshot::new(index, self.total_lines));
        }
    }

    pub(crate) fn finish(&self) {
        (self.callback)(ProgressSnapshot::complete(self.total_lines));
    }
}
