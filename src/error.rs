//! Error types for the `scene-features` crate.
//!
//! This module defines [`FeatureError`], the unified error type returned by
//! all fallible operations in the crate, and [`SceneFailure`], which tags a
//! scene-scoped error with the video and scene it came from so batch callers
//! can report it without losing the rows computed for other scenes.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

/// Which input table an ordering problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// The per-frame quality table.
    Quality,
    /// The per-point optical-flow table.
    Flow,
}

impl Display for TableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TableKind::Quality => write!(f, "quality"),
            TableKind::Flow => write!(f, "flow"),
        }
    }
}

/// The unified error type for all `scene-features` operations.
///
/// Every public function that can fail returns `Result<T, FeatureError>`.
/// Variants carry enough context to locate the offending scene or row.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FeatureError {
    /// A scene has no quality rows, so none of its statistics are defined.
    #[error("Scene {scene_index} [{begin_frame}, {end_frame}) has no quality rows")]
    EmptyScene {
        /// Position of the scene within its video.
        scene_index: usize,
        /// First frame of the scene (inclusive).
        begin_frame: u64,
        /// End of the scene (exclusive).
        end_frame: u64,
    },

    /// A flow row references a frame outside the scene it was assigned to.
    #[error(
        "Flow row at frame {frame_number} lies outside scene range [{begin_frame}, {end_frame})"
    )]
    FlowFrameOutOfRange {
        /// Frame number carried by the flow row.
        frame_number: u64,
        /// First frame of the scene (inclusive).
        begin_frame: u64,
        /// End of the scene (exclusive).
        end_frame: u64,
    },

    /// A histogram bin name could not be decoded to its numeric edge.
    #[error("Malformed histogram bin name: {0:?}")]
    MalformedBinName(String),

    /// A ratio was requested whose denominator is zero.
    #[error("Division by zero while computing {quantity}")]
    DegenerateDivision {
        /// Human-readable name of the ratio.
        quantity: &'static str,
    },

    /// Frame numbers in an input table are not in ascending order.
    #[error(
        "Frame numbers in the {table} table are out of order at row {position}: {current} follows {previous}"
    )]
    UnorderedFrames {
        /// The table that is out of order.
        table: TableKind,
        /// Row index of the offending row.
        position: usize,
        /// Frame number of the preceding row.
        previous: u64,
        /// Frame number of the offending row.
        current: u64,
    },

    /// An extraction option is outside its valid domain.
    #[error("Invalid feature options: {0}")]
    InvalidOptions(String),
}

/// A scene-scoped failure, tagged with where it happened.
///
/// Produced by the video and batch drivers; the rest of the video's scenes
/// are still extracted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Video {video_id:?} scene {scene_index} [{begin_frame}, {end_frame}): {error}")]
pub struct SceneFailure {
    /// Identifier of the video the scene belongs to.
    pub video_id: String,
    /// Position of the scene within its video.
    pub scene_index: usize,
    /// First frame of the scene (inclusive).
    pub begin_frame: u64,
    /// End of the scene (exclusive).
    pub end_frame: u64,
    /// What went wrong.
    #[source]
    pub error: FeatureError,
}
