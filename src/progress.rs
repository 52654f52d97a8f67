//! Progress reporting for batch runs.
//!
//! This module provides [`ProgressCallback`] for monitoring how many videos a
//! batch has processed, and [`ProgressInfo`] for detailed progress snapshots.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use scene_features::{BatchOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let options = BatchOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The kind of operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Extracting features for the scenes of one or more videos.
    SceneExtraction,
}

/// A snapshot of batch progress.
///
/// Delivered to [`ProgressCallback::on_progress`] at a cadence controlled by
/// [`BatchOptions::with_batch_size`](crate::BatchOptions::with_batch_size).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many videos have been processed so far.
    pub current: u64,
    /// Total videos expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Identifier of the video that just finished.
    pub current_video: Option<String>,
}

/// Trait for receiving progress updates during a batch.
///
/// Implementations must be [`Send`] and [`Sync`] because callbacks may be
/// invoked from rayon worker threads.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals during a batch.
    fn on_progress(&self, info: &ProgressInfo);
}

/// A no-op implementation that discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one completed video and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&mut self, video_id: &str) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(Some(video_id));
            self.items_since_last_report = 0;
        }
    }

    /// Emit a final report unless the last advance already did.
    pub(crate) fn finish(&mut self) {
        if self.items_since_last_report > 0 {
            self.report(None);
            self.items_since_last_report = 0;
        }
    }

    fn report(&self, video_id: Option<&str>) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let estimated_remaining = if self.current > 0 {
            self.total.map(|t| {
                let remaining = t.saturating_sub(self.current);
                let per_item = elapsed / self.current as u32;
                per_item * remaining as u32
            })
        } else {
            None
        };

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_video: video_id.map(str::to_string),
        };

        self.callback.on_progress(&info);
    }
}
