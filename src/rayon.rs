//! Parallel scene extraction.
//!
//! Scenes read disjoint slices of immutable input tables and write only
//! their own output row, so they can be extracted on rayon's pool with no
//! locking. Indexed parallel iterators keep results in input order.
//!
//! The public API is exposed through
//! [`analyze_video_parallel`](crate::analyze_video_parallel) and
//! [`analyze_batch_parallel`](crate::analyze_batch_parallel); this module
//! contains only the internal implementation.

use std::sync::Mutex;

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::configuration::{BatchOptions, FeatureOptions};
use crate::error::FeatureError;
use crate::progress::{OperationType, ProgressTracker};
use crate::scene::{Scene, SceneFeatureRow, extract_scene};
use crate::video::{BatchReport, VideoAnalysis, VideoInput, analyze_video_parallel};

/// Extract every scene on the rayon pool, preserving scene order.
pub(crate) fn extract_scenes_parallel(
    scenes: &[Scene<'_>],
    options: &FeatureOptions,
) -> Vec<Result<SceneFeatureRow, FeatureError>> {
    let options = *options;
    scenes
        .par_iter()
        .map(|scene| extract_scene(*scene, &options))
        .collect()
}

/// Analyse videos on the rayon pool, preserving video order.
pub(crate) fn analyze_batch_parallel(inputs: &[VideoInput], options: &BatchOptions) -> BatchReport {
    let tracker = Mutex::new(ProgressTracker::new(
        options.progress.clone(),
        OperationType::SceneExtraction,
        Some(inputs.len() as u64),
        options.batch_size,
    ));

    let outcomes: Vec<Result<VideoAnalysis, FeatureError>> = inputs
        .par_iter()
        .map(|input| {
            let outcome = analyze_video_parallel(
                &input.video_id,
                &input.quality,
                &input.flow,
                &options.features,
            );
            if let Ok(mut tracker) = tracker.lock() {
                tracker.advance(&input.video_id);
            }
            outcome
        })
        .collect();

    if let Ok(mut tracker) = tracker.lock() {
        tracker.finish();
    }

    let mut report = BatchReport::default();
    for (input, outcome) in inputs.iter().zip(outcomes) {
        report.record(&input.video_id, outcome);
    }
    report
}
