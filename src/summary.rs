//! Video-level summary of a scene feature table.
//!
//! [`VideoSummary`] condenses a [`VideoFeatureTable`] into one record per
//! video: how the video is cut (scene counts, static openings and endings)
//! and, for action scenes only, duration-weighted picture and motion
//! statistics in an [`ActionSummary`].
//!
//! # Example
//!
//! ```
//! use scene_features::{analyze_video, FeatureOptions, FrameQualityRow, VideoSummary};
//!
//! let quality: Vec<_> = (0..6)
//!     .map(|frame| FrameQualityRow::new(frame, frame as f64 / 10.0, 120.0).with_transition(frame == 2))
//!     .collect();
//!
//! let analysis = analyze_video("clip-1", &quality, &[], &FeatureOptions::new())?;
//! let summary = VideoSummary::from_table(&analysis.table);
//! assert_eq!(summary.scene_count, 2);
//! assert_eq!(summary.static_scene_count, 2);
//! assert!(summary.starts_static);
//! assert!(summary.action.is_none());
//! # Ok::<(), scene_features::FeatureError>(())
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scene::SceneFeatureRow;
use crate::statistics::{mean, weighted_mean};
use crate::video::VideoFeatureTable;

/// Editing and picture statistics of one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    /// Identifier of the video.
    pub video_id: String,
    /// Number of extracted scenes.
    pub scene_count: usize,
    /// Scenes classified static.
    pub static_scene_count: usize,
    /// Scenes classified action.
    pub action_scene_count: usize,
    /// Sum of scene durations in seconds.
    pub total_duration: f64,
    /// Mean scene duration; `None` without scenes.
    pub average_scene_duration: Option<f64>,
    /// Share of scenes that are action scenes; `None` without scenes.
    pub action_scene_fraction: Option<f64>,
    /// Share of the total duration spent in action scenes; `None` when the
    /// total duration is zero.
    pub action_time_fraction: Option<f64>,
    /// The first scene is static.
    pub starts_static: bool,
    /// Duration of the first scene if it is static, otherwise zero.
    pub static_begin_duration: f64,
    /// The last scene is static.
    pub ends_static: bool,
    /// Duration of the last scene if it is static, otherwise zero.
    pub static_end_duration: f64,
    /// Statistics over action scenes; `None` when there are none.
    pub action: Option<ActionSummary>,
}

/// Statistics computed over the action scenes of a video.
///
/// "Weighted" means weighted by scene duration. Weighted statistics are
/// `None` when every action scene has zero duration; scene values that are
/// themselves undefined are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSummary {
    /// Dominant hue bins across action scenes, strongest first.
    pub top_colors: Vec<String>,
    /// Weighted mean of scene saturation.
    pub average_saturation: Option<f64>,
    /// Saturation of the most saturated scene.
    pub most_saturated_scene_saturation: Option<f64>,
    /// Saturation of the least saturated scene.
    pub least_saturated_scene_saturation: Option<f64>,
    /// Weighted mean of scene value.
    pub average_value: Option<f64>,
    /// Value of the brightest scene.
    pub brightest_scene_value: Option<f64>,
    /// Value of the darkest scene.
    pub darkest_scene_value: Option<f64>,
    /// Largest shake coefficient.
    pub max_shake: Option<f64>,
    /// Duration of the scene with the largest shake.
    pub max_shake_duration: Option<f64>,
    /// Weighted mean shake coefficient.
    pub shake_weighted: Option<f64>,
    /// Unweighted mean shake coefficient.
    pub shake_unweighted: Option<f64>,
    /// Largest spread between the 75th and 25th flow percentiles.
    pub max_interquartile_spread: Option<f64>,
    /// Weighted mean flow-angle standard deviation.
    pub angle_std_dev_weighted: Option<f64>,
    /// Unweighted mean flow-angle standard deviation.
    pub angle_std_dev_unweighted: Option<f64>,
    /// Largest flow-angle standard deviation.
    pub largest_angle_std_dev: Option<f64>,
    /// Duration of the scene with the largest flow-angle deviation.
    pub largest_angle_std_dev_duration: Option<f64>,
    /// Smallest flow-angle standard deviation.
    pub smallest_angle_std_dev: Option<f64>,
    /// Weighted mean of trackable points per frame.
    pub trackable_points_weighted: Option<f64>,
    /// Unweighted mean of trackable points per frame.
    pub trackable_points_unweighted: Option<f64>,
    /// Weighted mean blur.
    pub blur_weighted: Option<f64>,
    /// Weighted share of blurry frames.
    pub blurry_fraction_weighted: Option<f64>,
}

impl VideoSummary {
    /// Summarise a video's scene table.
    pub fn from_table(table: &VideoFeatureTable) -> Self {
        let scenes: Vec<&SceneFeatureRow> = table.iter().map(|row| &row.features).collect();
        let action: Vec<&SceneFeatureRow> = scenes.iter().copied().filter(|s| !s.is_static).collect();

        let scene_count = scenes.len();
        let action_scene_count = action.len();
        let total_duration: f64 = scenes.iter().map(|s| s.duration).sum();
        let action_duration: f64 = action.iter().map(|s| s.duration).sum();

        let static_duration = |scene: Option<&&SceneFeatureRow>| match scene {
            Some(scene) if scene.is_static => (true, scene.duration),
            _ => (false, 0.0),
        };
        let (starts_static, static_begin_duration) = static_duration(scenes.first());
        let (ends_static, static_end_duration) = static_duration(scenes.last());

        let per_scene = |value: f64| (scene_count > 0).then(|| value / scene_count as f64);

        Self {
            video_id: table.video_id.clone(),
            scene_count,
            static_scene_count: scene_count - action_scene_count,
            action_scene_count,
            total_duration,
            average_scene_duration: per_scene(total_duration),
            action_scene_fraction: per_scene(action_scene_count as f64),
            action_time_fraction: (total_duration > 0.0).then(|| action_duration / total_duration),
            starts_static,
            static_begin_duration,
            ends_static,
            static_end_duration,
            action: (!action.is_empty()).then(|| ActionSummary::from_scenes(&action)),
        }
    }
}

impl ActionSummary {
    /// Summarise a set of action scenes.
    pub fn from_scenes(scenes: &[&SceneFeatureRow]) -> Self {
        let saturation = |s: &SceneFeatureRow| s.average_saturation;
        let value = |s: &SceneFeatureRow| s.average_value;
        let shake = |s: &SceneFeatureRow| Some(s.shake_coefficient);
        let angle_std_dev = |s: &SceneFeatureRow| s.flow_angle_std_dev;
        let trackable = |s: &SceneFeatureRow| Some(s.average_trackable_points);
        let spread = |s: &SceneFeatureRow| match (s.flow_percentile_75, s.flow_percentile_25) {
            (Some(upper), Some(lower)) => Some(upper - lower),
            _ => None,
        };

        let max_shake = extreme(scenes, shake, Extreme::Largest);
        let largest_angle = extreme(scenes, angle_std_dev, Extreme::Largest);

        Self {
            top_colors: ranked_colors(scenes),
            average_saturation: weighted(scenes, saturation),
            most_saturated_scene_saturation: value_of(extreme(scenes, saturation, Extreme::Largest)),
            least_saturated_scene_saturation: value_of(extreme(scenes, saturation, Extreme::Smallest)),
            average_value: weighted(scenes, value),
            brightest_scene_value: value_of(extreme(scenes, value, Extreme::Largest)),
            darkest_scene_value: value_of(extreme(scenes, value, Extreme::Smallest)),
            max_shake: value_of(max_shake),
            max_shake_duration: max_shake.map(|(_, duration)| duration),
            shake_weighted: weighted(scenes, shake),
            shake_unweighted: unweighted(scenes, shake),
            max_interquartile_spread: value_of(extreme(scenes, spread, Extreme::Largest)),
            angle_std_dev_weighted: weighted(scenes, angle_std_dev),
            angle_std_dev_unweighted: unweighted(scenes, angle_std_dev),
            largest_angle_std_dev: value_of(largest_angle),
            largest_angle_std_dev_duration: largest_angle.map(|(_, duration)| duration),
            smallest_angle_std_dev: value_of(extreme(scenes, angle_std_dev, Extreme::Smallest)),
            trackable_points_weighted: weighted(scenes, trackable),
            trackable_points_unweighted: unweighted(scenes, trackable),
            blur_weighted: weighted(scenes, |s| Some(s.average_blur)),
            blurry_fraction_weighted: weighted(scenes, |s| Some(s.blurry_frame_fraction)),
        }
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Largest,
    Smallest,
}

fn weighted(scenes: &[&SceneFeatureRow], field: impl Fn(&SceneFeatureRow) -> Option<f64>) -> Option<f64> {
    weighted_mean(
        scenes
            .iter()
            .filter_map(|scene| field(*scene).map(|value| (value, scene.duration))),
    )
}

fn unweighted(scenes: &[&SceneFeatureRow], field: impl Fn(&SceneFeatureRow) -> Option<f64>) -> Option<f64> {
    let values: Vec<f64> = scenes.iter().filter_map(|scene| field(*scene)).collect();
    mean(&values)
}

/// The extreme defined value and the duration of its scene; the first scene
/// wins ties. NaN values are skipped.
fn extreme(
    scenes: &[&SceneFeatureRow],
    field: impl Fn(&SceneFeatureRow) -> Option<f64>,
    which: Extreme,
) -> Option<(f64, f64)> {
    scenes
        .iter()
        .filter_map(|scene| field(*scene).map(|value| (value, scene.duration)))
        .filter(|(value, _)| !value.is_nan())
        .fold(None, |best, candidate| match best {
            None => Some(candidate),
            Some(current) => {
                let better = match which {
                    Extreme::Largest => candidate.0 > current.0,
                    Extreme::Smallest => candidate.0 < current.0,
                };
                Some(if better { candidate } else { current })
            }
        })
}

fn value_of(found: Option<(f64, f64)>) -> Option<f64> {
    found.map(|(value, _)| value)
}

/// Rank hue bins across scenes.
///
/// With `n` the longest top-color list, a scene's color at rank `r`
/// (0-based) earns `(n − r) × duration` points. The `n` best-scoring names
/// are returned; ties keep first-seen order.
fn ranked_colors(scenes: &[&SceneFeatureRow]) -> Vec<String> {
    let rank_count = scenes.iter().map(|s| s.top_colors.len()).max().unwrap_or(0);
    let mut points: Vec<(&str, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for scene in scenes {
        for (rank, name) in scene.top_colors.iter().enumerate() {
            let position = *positions.entry(name.as_str()).or_insert_with(|| {
                points.push((name.as_str(), 0.0));
                points.len() - 1
            });
            points[position].1 += (rank_count - rank) as f64 * scene.duration;
        }
    }

    points.sort_by(|a, b| b.1.total_cmp(&a.1));
    points
        .into_iter()
        .take(rank_count)
        .map(|(name, _)| name.to_string())
        .collect()
}
