//! Per-video aggregation.
//!
//! [`analyze_video`] segments one video, extracts every scene, and collects
//! the resulting rows into a [`VideoFeatureTable`]. A scene that fails is
//! recorded as a [`SceneFailure`] and does not prevent the other scenes from
//! being extracted. [`analyze_batch`] does the same for many videos.
//!
//! # Example
//!
//! ```
//! use scene_features::{analyze_video, FeatureOptions, FrameQualityRow};
//!
//! let quality: Vec<_> = (0..5)
//!     .map(|frame| FrameQualityRow::new(frame, frame as f64 / 10.0, 120.0).with_transition(frame == 2))
//!     .collect();
//!
//! let analysis = analyze_video("clip-1", &quality, &[], &FeatureOptions::new())?;
//! assert!(analysis.is_complete());
//! assert_eq!(analysis.table.len(), 2);
//! assert_eq!(analysis.table.rows[1].video_id, "clip-1");
//! # Ok::<(), scene_features::FeatureError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::configuration::{BatchOptions, FeatureOptions};
use crate::error::{FeatureError, SceneFailure};
use crate::progress::{OperationType, ProgressTracker};
use crate::scene::{Scene, SceneFeatureRow, extract_scene};
use crate::segment;
use crate::table::{FlowPointRow, FrameQualityRow};

/// One scene's features tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSceneRow {
    /// Identifier of the video.
    pub video_id: String,
    /// Position of the scene within the video.
    pub scene_index: usize,
    /// First frame of the scene (inclusive).
    pub begin_frame: u64,
    /// End of the scene (exclusive).
    pub end_frame: u64,
    /// The scene's features.
    #[serde(flatten)]
    pub features: SceneFeatureRow,
}

/// All successfully extracted scenes of a video, in ascending frame order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFeatureTable {
    /// Identifier of the video.
    pub video_id: String,
    /// Scene rows ordered by `begin_frame`.
    pub rows: Vec<VideoSceneRow>,
}

impl VideoFeatureTable {
    /// Create an empty table for `video_id`.
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            rows: Vec::new(),
        }
    }

    /// Number of scene rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no scene was extracted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the scene rows in frame order.
    pub fn iter(&self) -> impl Iterator<Item = &VideoSceneRow> {
        self.rows.iter()
    }
}

/// The outcome of analysing one video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoAnalysis {
    /// Rows for every scene that was extracted.
    pub table: VideoFeatureTable,
    /// Scenes that could not be extracted.
    pub failures: Vec<SceneFailure>,
    /// Number of scenes the video was split into.
    pub scene_count: usize,
}

impl VideoAnalysis {
    /// Returns `true` if every scene was extracted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Segment a video and extract every scene.
///
/// Returns an error only for problems that affect the whole video: invalid
/// options or out-of-order input tables. Scene-level errors are collected in
/// [`VideoAnalysis::failures`].
pub fn analyze_video(
    video_id: &str,
    quality: &[FrameQualityRow],
    flow: &[FlowPointRow],
    options: &FeatureOptions,
) -> Result<VideoAnalysis, FeatureError> {
    options.validate()?;
    let scenes = segment::scenes(quality, flow)?;
    let results = scenes
        .iter()
        .map(|scene| extract_scene(*scene, options))
        .collect();
    Ok(assemble(video_id, &scenes, results))
}

/// Like [`analyze_video`], with scenes extracted on rayon's thread pool.
///
/// Output order is identical to the sequential version.
#[cfg(feature = "rayon")]
pub fn analyze_video_parallel(
    video_id: &str,
    quality: &[FrameQualityRow],
    flow: &[FlowPointRow],
    options: &FeatureOptions,
) -> Result<VideoAnalysis, FeatureError> {
    options.validate()?;
    let scenes = segment::scenes(quality, flow)?;
    let results = crate::rayon::extract_scenes_parallel(&scenes, options);
    Ok(assemble(video_id, &scenes, results))
}

/// Pair scenes with their extraction results, splitting rows from failures.
pub(crate) fn assemble(
    video_id: &str,
    scenes: &[Scene<'_>],
    results: Vec<Result<SceneFeatureRow, FeatureError>>,
) -> VideoAnalysis {
    let mut table = VideoFeatureTable::new(video_id);
    let mut failures = Vec::new();

    for (scene, result) in scenes.iter().zip(results) {
        match result {
            Ok(features) => table.rows.push(VideoSceneRow {
                video_id: video_id.to_string(),
                scene_index: scene.index,
                begin_frame: scene.begin_frame,
                end_frame: scene.end_frame,
                features,
            }),
            Err(error) => {
                let failure = SceneFailure {
                    video_id: video_id.to_string(),
                    scene_index: scene.index,
                    begin_frame: scene.begin_frame,
                    end_frame: scene.end_frame,
                    error,
                };
                log::warn!("{failure}");
                failures.push(failure);
            }
        }
    }

    VideoAnalysis {
        table,
        failures,
        scene_count: scenes.len(),
    }
}

/// One video's input tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInput {
    /// Identifier of the video.
    pub video_id: String,
    /// Per-frame quality rows.
    pub quality: Vec<FrameQualityRow>,
    /// Per-point flow rows.
    #[serde(default)]
    pub flow: Vec<FlowPointRow>,
}

/// A video that could not be analysed at all.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRejection {
    /// Identifier of the video.
    pub video_id: String,
    /// Why it was rejected.
    pub error: FeatureError,
}

/// The outcome of a batch run, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    /// Videos that were segmented, possibly with some failed scenes.
    pub videos: Vec<VideoAnalysis>,
    /// Videos rejected before segmentation.
    pub rejected: Vec<VideoRejection>,
}

impl BatchReport {
    /// All extracted scene rows across videos.
    pub fn rows(&self) -> impl Iterator<Item = &VideoSceneRow> {
        self.videos.iter().flat_map(|video| video.table.iter())
    }

    /// All scene failures across videos.
    pub fn scene_failures(&self) -> impl Iterator<Item = &SceneFailure> {
        self.videos.iter().flat_map(|video| video.failures.iter())
    }

    /// Returns `true` if every video and every scene succeeded.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty() && self.videos.iter().all(VideoAnalysis::is_complete)
    }

    pub(crate) fn record(&mut self, video_id: &str, outcome: Result<VideoAnalysis, FeatureError>) {
        match outcome {
            Ok(analysis) => self.videos.push(analysis),
            Err(error) => {
                log::warn!("Rejected video {video_id:?}: {error}");
                self.rejected.push(VideoRejection {
                    video_id: video_id.to_string(),
                    error,
                });
            }
        }
    }
}

/// Analyse many videos one after another.
///
/// Failures never stop the batch: rejected videos and failed scenes are
/// collected in the returned [`BatchReport`].
pub fn analyze_batch(inputs: &[VideoInput], options: &BatchOptions) -> BatchReport {
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::SceneExtraction,
        Some(inputs.len() as u64),
        options.batch_size,
    );

    let mut report = BatchReport::default();
    for input in inputs {
        let outcome = analyze_video(&input.video_id, &input.quality, &input.flow, &options.features);
        report.record(&input.video_id, outcome);
        tracker.advance(&input.video_id);
    }
    tracker.finish();
    report
}

/// Like [`analyze_batch`], with videos and their scenes spread over rayon's
/// thread pool. Videos appear in the report in input order.
#[cfg(feature = "rayon")]
pub fn analyze_batch_parallel(inputs: &[VideoInput], options: &BatchOptions) -> BatchReport {
    crate::rayon::analyze_batch_parallel(inputs, options)
}
