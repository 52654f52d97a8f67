//! Scene-level feature extraction.
//!
//! A [`Scene`] is a borrowed view of one contiguous frame range of a video:
//! its quality rows and the flow rows whose current frame falls inside it.
//! [`SceneStatistics`] validates the view once and then answers individual
//! statistics; [`extract_scene`] bundles all of them into a
//! [`SceneFeatureRow`].
//!
//! # Example
//!
//! ```
//! use scene_features::{extract_scene, FeatureOptions, FlowPointRow, FrameQualityRow, Scene};
//!
//! let quality = vec![
//!     FrameQualityRow::new(0, 0.0, 150.0),
//!     FrameQualityRow::new(1, 0.1, 50.0),
//!     FrameQualityRow::new(2, 0.2, 150.0),
//! ];
//! let flow = vec![FlowPointRow::new(1, 0.1, (0.0, 0.0), (3.0, 4.0))];
//!
//! let row = extract_scene(Scene::new(0, 0, 3, &quality, &flow), &FeatureOptions::new())?;
//! assert_eq!(row.average_flow_distance, Some(5.0));
//! assert!(!row.is_static);
//! # Ok::<(), scene_features::FeatureError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::configuration::FeatureOptions;
use crate::error::FeatureError;
use crate::flow::FlowMotion;
use crate::histogram::Channel;
use crate::statistics::{mean, quantile_sorted, sample_std_dev};
use crate::table::{FlowPointRow, FrameQualityRow};

/// One scene of a video: a half-open frame range and the rows inside it.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Position of the scene within its video.
    pub index: usize,
    /// First frame of the scene (inclusive).
    pub begin_frame: u64,
    /// End of the scene (exclusive).
    pub end_frame: u64,
    /// Quality rows of the scene, in frame order.
    pub quality: &'a [FrameQualityRow],
    /// Flow rows whose current frame lies in the scene.
    pub flow: &'a [FlowPointRow],
}

impl<'a> Scene<'a> {
    /// Create a scene view.
    pub fn new(
        index: usize,
        begin_frame: u64,
        end_frame: u64,
        quality: &'a [FrameQualityRow],
        flow: &'a [FlowPointRow],
    ) -> Self {
        Self {
            index,
            begin_frame,
            end_frame,
            quality,
            flow,
        }
    }

    /// Returns `true` if `frame_number` lies in `[begin_frame, end_frame)`.
    pub fn contains(&self, frame_number: u64) -> bool {
        (self.begin_frame..self.end_frame).contains(&frame_number)
    }

    /// Number of quality rows (frames) in the scene.
    pub fn frame_count(&self) -> usize {
        self.quality.len()
    }
}

/// Which kind of masked pixel to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelKind {
    /// Near-black pixels.
    Black,
    /// Near-white pixels.
    White,
}

/// Summary features of one scene.
///
/// Statistics that are undefined for the scene are `None`: flow statistics
/// when the scene has no flow rows (or fewer than two for the angle
/// deviation), and saturation/value averages when the histograms are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFeatureRow {
    /// Dominant hue-bin names, strongest first.
    pub top_colors: Vec<String>,
    /// Count-weighted mean saturation over all frames.
    pub average_saturation: Option<f64>,
    /// Count-weighted mean value over all frames.
    pub average_value: Option<f64>,
    /// Share of all scene pixels that are black.
    pub black_pixel_fraction: f64,
    /// Share of all scene pixels that are white.
    pub white_pixel_fraction: f64,
    /// 25th percentile of flow distance.
    pub flow_percentile_25: Option<f64>,
    /// Median flow distance.
    pub flow_percentile_50: Option<f64>,
    /// 75th percentile of flow distance.
    pub flow_percentile_75: Option<f64>,
    /// Mean flow distance.
    pub average_flow_distance: Option<f64>,
    /// Mean flow angle in radians.
    pub average_flow_angle: Option<f64>,
    /// Sample standard deviation of flow angle.
    pub flow_angle_std_dev: Option<f64>,
    /// `true` for a static scene, `false` for an action scene.
    pub is_static: bool,
    /// Mean over frames of the per-frame median flow distance.
    pub shake_coefficient: f64,
    /// Flow rows per frame.
    pub average_trackable_points: f64,
    /// Mean blur.
    pub average_blur: f64,
    /// Share of frames below the blur threshold.
    pub blurry_frame_fraction: f64,
    /// Last frame time minus first frame time, in seconds.
    pub duration: f64,
    /// Number of frames in the scene.
    pub frame_count: usize,
    /// Number of flow rows in the scene.
    pub flow_point_count: usize,
}

/// Validated statistics over one [`Scene`].
#[derive(Debug, Clone)]
pub struct SceneStatistics<'a> {
    scene: Scene<'a>,
    motions: Vec<FlowMotion>,
    sorted_distances: Vec<f64>,
    start_time: f64,
    duration: f64,
}

impl<'a> SceneStatistics<'a> {
    /// Validate a scene and derive its flow motions.
    ///
    /// Fails with [`FeatureError::EmptyScene`] when the scene has no quality
    /// rows and with [`FeatureError::FlowFrameOutOfRange`] when a flow row's
    /// frame lies outside the scene's range.
    pub fn new(scene: Scene<'a>) -> Result<Self, FeatureError> {
        if scene.quality.is_empty() {
            return Err(FeatureError::EmptyScene {
                scene_index: scene.index,
                begin_frame: scene.begin_frame,
                end_frame: scene.end_frame,
            });
        }

        if let Some(row) = scene.flow.iter().find(|row| !scene.contains(row.frame_number)) {
            return Err(FeatureError::FlowFrameOutOfRange {
                frame_number: row.frame_number,
                begin_frame: scene.begin_frame,
                end_frame: scene.end_frame,
            });
        }

        let (start_time, end_time) = scene
            .quality
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), row| {
                (low.min(row.time), high.max(row.time))
            });

        let motions: Vec<FlowMotion> = scene.flow.iter().map(FlowMotion::from_row).collect();
        let mut sorted_distances: Vec<f64> = motions.iter().map(|m| m.distance).collect();
        sorted_distances.sort_by(f64::total_cmp);

        Ok(Self {
            scene,
            motions,
            sorted_distances,
            start_time,
            duration: end_time - start_time,
        })
    }

    /// The underlying scene.
    pub fn scene(&self) -> &Scene<'a> {
        &self.scene
    }

    /// Per-row distance and angle, in flow-row order.
    pub fn motions(&self) -> &[FlowMotion] {
        &self.motions
    }

    /// Scene duration in seconds; zero for a single frame.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Mean blur across the scene's frames.
    pub fn average_blur(&self) -> f64 {
        let total: f64 = self.scene.quality.iter().map(|row| row.blur).sum();
        total / self.scene.frame_count() as f64
    }

    /// Share of frames whose blur is strictly below `threshold`.
    pub fn blurry_fraction(&self, threshold: f64) -> f64 {
        let blurry = self
            .scene
            .quality
            .iter()
            .filter(|row| row.blur < threshold)
            .count();
        blurry as f64 / self.scene.frame_count() as f64
    }

    /// Share of all pixels in the scene that are black or white.
    ///
    /// `frame_pixel_area` is the pixel count of one frame; a zero area is a
    /// [`FeatureError::DegenerateDivision`].
    pub fn pixel_fraction(&self, kind: PixelKind, frame_pixel_area: f64) -> Result<f64, FeatureError> {
        let total_pixels = frame_pixel_area * self.scene.frame_count() as f64;
        let (quantity, pixels): (&'static str, fn(&FrameQualityRow) -> u64) = match kind {
            PixelKind::Black => ("black pixel fraction", |row| row.num_black_pixels),
            PixelKind::White => ("white pixel fraction", |row| row.num_white_pixels),
        };
        if total_pixels == 0.0 {
            return Err(FeatureError::DegenerateDivision { quantity });
        }
        let counted: f64 = self.scene.quality.iter().map(|row| pixels(row) as f64).sum();
        Ok(counted / total_pixels)
    }

    /// The `count` dominant hue bins of the scene.
    ///
    /// Each frame votes for its `count` largest hue bins; the bin ranked `r`
    /// (1-based) receives `(count + 1 − r) × duration`. Bins are returned by
    /// total vote, ties keeping the order in which bins were first voted for.
    pub fn top_colors(&self, count: usize) -> Vec<String> {
        let mut votes: Vec<(&str, f64)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for row in self.scene.quality {
            let mut ranked: Vec<_> = row.hue.bins.iter().collect();
            ranked.sort_by(|a, b| b.count.cmp(&a.count));

            for (rank, bin) in ranked.into_iter().take(count).enumerate() {
                let weight = (count - rank) as f64 * self.duration;
                let position = *positions.entry(bin.name.as_str()).or_insert_with(|| {
                    votes.push((bin.name.as_str(), 0.0));
                    votes.len() - 1
                });
                votes[position].1 += weight;
            }
        }

        votes.sort_by(|a, b| b.1.total_cmp(&a.1));
        votes
            .into_iter()
            .take(count)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Count-weighted mean saturation across every frame of the scene.
    pub fn average_saturation(&self) -> Result<f64, FeatureError> {
        self.channel_average(Channel::Saturation, "average saturation")
    }

    /// Count-weighted mean value (HSV brightness) across every frame.
    pub fn average_value(&self) -> Result<f64, FeatureError> {
        self.channel_average(Channel::Value, "average value")
    }

    fn channel_average(
        &self,
        channel: Channel,
        quantity: &'static str,
    ) -> Result<f64, FeatureError> {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for row in self.scene.quality {
            let histogram = row.histogram(channel);
            weighted += histogram.weighted_edge_sum(channel)?;
            total += histogram.total();
        }
        if total == 0.0 {
            return Err(FeatureError::DegenerateDivision { quantity });
        }
        Ok(weighted / total)
    }

    /// Flow-distance quantile, `q` in `[0, 1]`.
    pub fn flow_percentile(&self, q: f64) -> Option<f64> {
        if self.sorted_distances.is_empty() {
            return None;
        }
        Some(quantile_sorted(&self.sorted_distances, q))
    }

    /// Mean distance travelled by a flow point between frames.
    pub fn average_flow(&self) -> Option<f64> {
        mean(&self.sorted_distances)
    }

    /// Mean flow angle.
    pub fn average_flow_angle(&self) -> Option<f64> {
        mean(&self.angles())
    }

    /// Sample standard deviation of flow angle.
    pub fn flow_angle_std_dev(&self) -> Option<f64> {
        sample_std_dev(&self.angles())
    }

    fn angles(&self) -> Vec<f64> {
        self.motions.iter().map(|m| m.angle).collect()
    }

    /// Shakiness: the mean over frames of each frame's median flow distance.
    ///
    /// A scene without flow rows has a shake of zero.
    pub fn shake(&self) -> f64 {
        let mut per_frame: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
        for motion in &self.motions {
            per_frame
                .entry(motion.frame_number)
                .or_default()
                .push(motion.distance);
        }

        let medians: Vec<f64> = per_frame
            .into_values()
            .map(|mut distances| {
                distances.sort_by(f64::total_cmp);
                quantile_sorted(&distances, 0.5)
            })
            .collect();
        mean(&medians).unwrap_or(0.0)
    }

    /// Share of the scene's frames that contain above-threshold motion.
    ///
    /// With `remove_transitions` set and a scene longer than twice the
    /// buffer, moving points within `transition_buffer_seconds` of either
    /// scene edge are ignored.
    pub fn moving_frame_fraction(&self, options: &FeatureOptions) -> f64 {
        let buffer = options.transition_buffer_seconds;
        let trim = options.remove_transitions && self.duration > 2.0 * buffer;

        let moving_frames: BTreeSet<u64> = self
            .motions
            .iter()
            .filter(|m| m.distance > options.motion_threshold)
            .filter(|m| {
                if !trim {
                    return true;
                }
                let scene_time = m.time - self.start_time;
                scene_time > buffer && scene_time < self.duration - buffer
            })
            .map(|m| m.frame_number)
            .collect();

        moving_frames.len() as f64 / self.scene.frame_count() as f64
    }

    /// Static/action classification.
    pub fn is_static(&self, options: &FeatureOptions) -> bool {
        let any_motion = self
            .motions
            .iter()
            .any(|m| m.distance > options.motion_threshold);
        if !any_motion {
            return true;
        }
        self.moving_frame_fraction(options) < options.static_fraction_threshold
    }

    /// Number of tracked points for every frame that has at least one.
    pub fn trackable_points_per_frame(&self) -> BTreeMap<u64, usize> {
        let mut counts = BTreeMap::new();
        for motion in &self.motions {
            *counts.entry(motion.frame_number).or_insert(0) += 1;
        }
        counts
    }

    /// Flow rows per frame of the scene.
    pub fn average_trackable_points(&self) -> f64 {
        self.motions.len() as f64 / self.scene.frame_count() as f64
    }

    /// Compute every feature of the scene.
    pub fn to_row(&self, options: &FeatureOptions) -> Result<SceneFeatureRow, FeatureError> {
        let area = options.frame_pixel_area();
        Ok(SceneFeatureRow {
            top_colors: self.top_colors(options.top_color_count),
            average_saturation: undefined_on_zero(self.average_saturation())?,
            average_value: undefined_on_zero(self.average_value())?,
            black_pixel_fraction: self.pixel_fraction(PixelKind::Black, area)?,
            white_pixel_fraction: self.pixel_fraction(PixelKind::White, area)?,
            flow_percentile_25: self.flow_percentile(0.25),
            flow_percentile_50: self.flow_percentile(0.50),
            flow_percentile_75: self.flow_percentile(0.75),
            average_flow_distance: self.average_flow(),
            average_flow_angle: self.average_flow_angle(),
            flow_angle_std_dev: self.flow_angle_std_dev(),
            is_static: self.is_static(options),
            shake_coefficient: self.shake(),
            average_trackable_points: self.average_trackable_points(),
            average_blur: self.average_blur(),
            blurry_frame_fraction: self.blurry_fraction(options.blur_threshold),
            duration: self.duration,
            frame_count: self.scene.frame_count(),
            flow_point_count: self.motions.len(),
        })
    }
}

/// Histogram averages over an all-zero histogram are reported as undefined.
fn undefined_on_zero(result: Result<f64, FeatureError>) -> Result<Option<f64>, FeatureError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(FeatureError::DegenerateDivision { quantity }) => {
            log::debug!("{quantity} is undefined: histogram weight is zero");
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// Compute the feature row for one scene.
pub fn extract_scene(scene: Scene<'_>, options: &FeatureOptions) -> Result<SceneFeatureRow, FeatureError> {
    log::debug!(
        "Extracting scene {} [{}, {}) ({} frames, {} flow rows)",
        scene.index,
        scene.begin_frame,
        scene.end_frame,
        scene.quality.len(),
        scene.flow.len(),
    );
    SceneStatistics::new(scene)?.to_row(options)
}
