//! # scene-features
//!
//! Turn per-frame video measurements into per-scene feature rows.
//!
//! `scene-features` reads two tables produced by an upstream frame analyser:
//! a [`FrameQualityRow`] for every frame (blur, HSV histograms, black/white
//! pixel counts, scene-transition flag) and a [`FlowPointRow`] for every
//! tracked optical-flow point. It splits each video into scenes at the
//! flagged transitions and computes one [`SceneFeatureRow`] per scene:
//! dominant colors, average saturation and brightness, flow-distance
//! percentiles, shake, static/action classification and blur.
//!
//! ## Quick Start
//!
//! ### Analyse One Video
//!
//! ```
//! use scene_features::{analyze_video, FeatureOptions, FlowPointRow, FrameQualityRow};
//!
//! let quality: Vec<_> = (0..4)
//!     .map(|frame| FrameQualityRow::new(frame, frame as f64 * 0.04, 140.0))
//!     .collect();
//! let flow = vec![
//!     FlowPointRow::new(1, 0.04, (10.0, 10.0), (13.0, 14.0)),
//!     FlowPointRow::new(2, 0.08, (13.0, 14.0), (16.0, 18.0)),
//! ];
//!
//! let analysis = analyze_video("clip-1", &quality, &flow, &FeatureOptions::new())?;
//! let scene = &analysis.table.rows[0].features;
//! assert_eq!(scene.average_flow_distance, Some(5.0));
//! assert!(!scene.is_static);
//! # Ok::<(), scene_features::FeatureError>(())
//! ```
//!
//! ### Encode and Decode Histogram Bin Names
//!
//! ```
//! use scene_features::histogram::{decode, encode};
//! use scene_features::Channel;
//!
//! let bins = encode(Channel::Hue, 72, 180.0);
//! assert_eq!(bins[3].name, "hue_bin_7.5");
//! assert_eq!(decode(&bins[3].name)?, 7.5);
//! # Ok::<(), scene_features::FeatureError>(())
//! ```
//!
//! ### Summarise a Video
//!
//! ```
//! use scene_features::{analyze_video, FeatureOptions, FrameQualityRow, VideoSummary};
//!
//! let quality = vec![FrameQualityRow::new(0, 0.0, 90.0), FrameQualityRow::new(1, 0.5, 90.0)];
//! let analysis = analyze_video("clip-2", &quality, &[], &FeatureOptions::new())?;
//! let summary = VideoSummary::from_table(&analysis.table);
//! assert_eq!(summary.scene_count, 1);
//! assert!(summary.starts_static && summary.ends_static);
//! # Ok::<(), scene_features::FeatureError>(())
//! ```
//!
//! ## Features
//!
//! - **Scene segmentation**: gap-free frame ranges split at transition flags
//! - **Color features**: duration-weighted top hue bins, count-weighted
//!   saturation and value, black and white pixel shares
//! - **Motion features**: flow-distance percentiles, mean angle and its
//!   spread, shake coefficient, trackable points per frame
//! - **Static/action classification**: with optional trimming of motion
//!   near scene edges
//! - **Failure isolation**: a scene that cannot be computed is reported
//!   without dropping its neighbours
//! - **Batch processing**: many videos with progress callbacks
//! - **Validation**: inspect input tables before extraction
//! - **Video summaries**: editing and action-scene statistics per video
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `analyze_video_parallel()` and `analyze_batch_parallel()` spread work across rayon threads |
//! | `full` | Enables all of the above |

pub mod configuration;
pub mod error;
pub mod flow;
pub mod histogram;
pub mod progress;
#[cfg(feature = "rayon")]
mod rayon;
pub mod scene;
pub mod segment;
pub mod statistics;
pub mod summary;
pub mod table;
pub mod validation;
pub mod video;

pub use configuration::{BatchOptions, FeatureOptions};
pub use error::{FeatureError, SceneFailure, TableKind};
pub use flow::FlowMotion;
pub use histogram::{BinDescriptor, Channel, Histogram, HistogramBin, HistogramSpec};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use scene::{PixelKind, Scene, SceneFeatureRow, SceneStatistics, extract_scene};
pub use segment::{SceneRange, scenes, split_scenes};
pub use summary::{ActionSummary, VideoSummary};
pub use table::{FlowPointRow, FrameQualityRow, Point};
pub use validation::{ValidationReport, validate_tables};
#[cfg(feature = "rayon")]
pub use video::{analyze_batch_parallel, analyze_video_parallel};
pub use video::{
    BatchReport, VideoAnalysis, VideoFeatureTable, VideoInput, VideoRejection, VideoSceneRow,
    analyze_batch, analyze_video,
};
