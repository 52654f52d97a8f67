//! Scene segmentation.
//!
//! A quality row with `is_scene_transition` set ends the current scene; the
//! next scene starts right after it. The final scene always runs to the last
//! frame, so a video with no transitions is a single scene.
//!
//! # Example
//!
//! ```
//! use scene_features::{split_scenes, FrameQualityRow};
//!
//! let quality: Vec<_> = (0..5)
//!     .map(|frame| FrameQualityRow::new(frame, frame as f64 / 10.0, 120.0).with_transition(frame == 2))
//!     .collect();
//!
//! let ranges = split_scenes(&quality)?;
//! assert_eq!(ranges.len(), 2);
//! assert_eq!((ranges[0].begin_frame, ranges[0].end_frame), (0, 3));
//! assert_eq!((ranges[1].begin_frame, ranges[1].end_frame), (3, 5));
//! # Ok::<(), scene_features::FeatureError>(())
//! ```

use std::ops::Range;

use crate::error::{FeatureError, TableKind};
use crate::scene::Scene;
use crate::table::{FlowPointRow, FrameQualityRow};

/// The frame range of one scene and the quality rows it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRange {
    /// Position of the scene within its video.
    pub index: usize,
    /// First frame of the scene (inclusive).
    pub begin_frame: u64,
    /// End of the scene (exclusive).
    pub end_frame: u64,
    /// Indices of the scene's rows in the quality table.
    pub rows: Range<usize>,
}

/// Split a video's quality rows into consecutive scene ranges.
///
/// Ranges are gap-free: each scene begins where the previous one ended.
/// Frame numbers must be strictly increasing, otherwise
/// [`FeatureError::UnorderedFrames`] is returned. An empty table yields a
/// single empty scene.
pub fn split_scenes(quality: &[FrameQualityRow]) -> Result<Vec<SceneRange>, FeatureError> {
    check_quality_order(quality)?;

    let (first, last) = match (quality.first(), quality.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Ok(vec![SceneRange {
                index: 0,
                begin_frame: 0,
                end_frame: 0,
                rows: 0..0,
            }]);
        }
    };

    let mut ranges = Vec::new();
    let mut begin_frame = first.frame_number;
    let mut begin_row = 0;

    for (position, row) in quality.iter().enumerate() {
        let is_last = position + 1 == quality.len();
        if row.is_scene_transition && !is_last {
            let end_frame = row.frame_number + 1;
            ranges.push(SceneRange {
                index: ranges.len(),
                begin_frame,
                end_frame,
                rows: begin_row..position + 1,
            });
            begin_frame = end_frame;
            begin_row = position + 1;
        }
    }

    ranges.push(SceneRange {
        index: ranges.len(),
        begin_frame,
        end_frame: last.frame_number + 1,
        rows: begin_row..quality.len(),
    });

    log::debug!(
        "Split {} frames into {} scene(s)",
        quality.len(),
        ranges.len()
    );
    Ok(ranges)
}

/// Split a video into borrowed [`Scene`] views.
///
/// Flow rows are assigned by frame number. Rows that precede the first
/// scene stay with the first scene and rows past the last frame stay with
/// the last scene, so extraction reports them as
/// [`FeatureError::FlowFrameOutOfRange`] instead of dropping them.
pub fn scenes<'a>(
    quality: &'a [FrameQualityRow],
    flow: &'a [FlowPointRow],
) -> Result<Vec<Scene<'a>>, FeatureError> {
    let ranges = split_scenes(quality)?;
    check_flow_order(flow)?;

    let last_index = ranges.len() - 1;
    let scenes = ranges
        .into_iter()
        .map(|range| {
            let flow_start = if range.index == 0 {
                0
            } else {
                flow.partition_point(|row| row.frame_number < range.begin_frame)
            };
            let flow_end = if range.index == last_index {
                flow.len()
            } else {
                flow.partition_point(|row| row.frame_number < range.end_frame)
            };

            Scene::new(
                range.index,
                range.begin_frame,
                range.end_frame,
                &quality[range.rows],
                &flow[flow_start..flow_end],
            )
        })
        .collect();

    Ok(scenes)
}

fn check_quality_order(quality: &[FrameQualityRow]) -> Result<(), FeatureError> {
    for (position, pair) in quality.windows(2).enumerate() {
        if pair[1].frame_number <= pair[0].frame_number {
            return Err(FeatureError::UnorderedFrames {
                table: TableKind::Quality,
                position: position + 1,
                previous: pair[0].frame_number,
                current: pair[1].frame_number,
            });
        }
    }
    Ok(())
}

fn check_flow_order(flow: &[FlowPointRow]) -> Result<(), FeatureError> {
    for (position, pair) in flow.windows(2).enumerate() {
        if pair[1].frame_number < pair[0].frame_number {
            return Err(FeatureError::UnorderedFrames {
                table: TableKind::Flow,
                position: position + 1,
                previous: pair[0].frame_number,
                current: pair[1].frame_number,
            });
        }
    }
    Ok(())
}
