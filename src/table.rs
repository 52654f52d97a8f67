//! Input row types.
//!
//! A video is described by two aligned tables: one [`FrameQualityRow`] per
//! decoded frame and any number of [`FlowPointRow`]s per frame transition.
//! Both are produced upstream; this crate only reads them.

use serde::{Deserialize, Serialize};

use crate::histogram::{Channel, Histogram};

/// A 2-D pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Image-quality measurements for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameQualityRow {
    /// Frame number, strictly increasing within a video.
    pub frame_number: u64,
    /// Presentation time in seconds, non-decreasing within a video.
    pub time: f64,
    /// Variance of the Laplacian. Lower values mean a blurrier frame.
    pub blur: f64,
    /// `true` on the last frame before a cut.
    #[serde(default)]
    pub is_scene_transition: bool,
    /// Hue histogram (72 bins over `[0, 180)`).
    #[serde(default)]
    pub hue: Histogram,
    /// Saturation histogram (25 bins over `[0, 255)`).
    #[serde(default)]
    pub saturation: Histogram,
    /// Value histogram (25 bins over `[0, 255)`).
    #[serde(default)]
    pub value: Histogram,
    /// Pixels whose value component is at or below the black threshold.
    #[serde(default)]
    pub num_black_pixels: u64,
    /// Non-black pixels whose saturation is at or below the white threshold.
    #[serde(default)]
    pub num_white_pixels: u64,
}

impl FrameQualityRow {
    /// A row with empty histograms and no black/white pixels.
    pub fn new(frame_number: u64, time: f64, blur: f64) -> Self {
        Self {
            frame_number,
            time,
            blur,
            is_scene_transition: false,
            hue: Histogram::default(),
            saturation: Histogram::default(),
            value: Histogram::default(),
            num_black_pixels: 0,
            num_white_pixels: 0,
        }
    }

    /// Mark this row as the last frame before a cut.
    #[must_use]
    pub fn with_transition(mut self, is_scene_transition: bool) -> Self {
        self.is_scene_transition = is_scene_transition;
        self
    }

    /// Attach HSV histograms.
    #[must_use]
    pub fn with_histograms(
        mut self,
        hue: Histogram,
        saturation: Histogram,
        value: Histogram,
    ) -> Self {
        self.hue = hue;
        self.saturation = saturation;
        self.value = value;
        self
    }

    /// The histogram recorded for `channel`.
    pub fn histogram(&self, channel: Channel) -> &Histogram {
        match channel {
            Channel::Hue => &self.hue,
            Channel::Saturation => &self.saturation,
            Channel::Value => &self.value,
        }
    }

    /// Attach black and white pixel counts.
    #[must_use]
    pub fn with_pixel_counts(mut self, black: u64, white: u64) -> Self {
        self.num_black_pixels = black;
        self.num_white_pixels = white;
        self
    }
}

/// One tracked optical-flow point between two consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowPointRow {
    /// The current frame (the point was tracked from the previous one).
    pub frame_number: u64,
    /// Presentation time of the current frame in seconds.
    pub time: f64,
    /// Position in the previous frame.
    pub position_prev: Point,
    /// Position in the current frame.
    pub position_curr: Point,
}

impl FlowPointRow {
    /// Create a flow row.
    pub fn new(
        frame_number: u64,
        time: f64,
        position_prev: impl Into<Point>,
        position_curr: impl Into<Point>,
    ) -> Self {
        Self {
            frame_number,
            time,
            position_prev: position_prev.into(),
            position_curr: position_curr.into(),
        }
    }
}
