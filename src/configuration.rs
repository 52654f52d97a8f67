//! Extraction configuration.
//!
//! [`FeatureOptions`] holds the tunable thresholds used by the scene
//! extractor. It is `Copy` so every scene (and every worker thread) can take
//! its own value. [`BatchOptions`] wraps it together with the operational
//! settings used by the multi-video drivers, such as progress reporting.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use scene_features::{BatchOptions, FeatureOptions, ProgressCallback, ProgressInfo};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let features = FeatureOptions::new()
//!     .with_remove_transitions(true)
//!     .with_motion_threshold(1.5);
//! let batch = BatchOptions::new()
//!     .with_features(features)
//!     .with_progress(Arc::new(LogProgress))
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::FeatureError;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Thresholds and sizes used when computing scene features.
///
/// Defaults: 1 px of motion, a 0.25 moving-frame fraction for the
/// static/action split, blur below 100 counts as blurry, 480×360 frames and
/// ten dominant colours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureOptions {
    /// Flow distance (pixels) above which a point counts as moving.
    pub motion_threshold: f64,
    /// Ignore moving points near scene edges when classifying motion.
    pub remove_transitions: bool,
    /// Width of the ignored band at each scene edge, in seconds.
    pub transition_buffer_seconds: f64,
    /// How many dominant hue bins to report.
    pub top_color_count: usize,
    /// Frames with blur strictly below this value are blurry.
    pub blur_threshold: f64,
    /// Frame dimensions `(width, height)` used for pixel fractions.
    pub frame_size: (u32, u32),
    /// Scenes whose moving-frame fraction is below this are static.
    pub static_fraction_threshold: f64,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            motion_threshold: 1.0,
            remove_transitions: false,
            transition_buffer_seconds: 1.0,
            top_color_count: 10,
            blur_threshold: 100.0,
            frame_size: (480, 360),
            static_fraction_threshold: 0.25,
        }
    }
}

impl FeatureOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the motion threshold in pixels.
    #[must_use]
    pub fn with_motion_threshold(mut self, threshold: f64) -> Self {
        self.motion_threshold = threshold;
        self
    }

    /// Enable or disable trimming of moving points near scene edges.
    #[must_use]
    pub fn with_remove_transitions(mut self, remove: bool) -> Self {
        self.remove_transitions = remove;
        self
    }

    /// Set the edge band used when `remove_transitions` is on.
    #[must_use]
    pub fn with_transition_buffer_seconds(mut self, seconds: f64) -> Self {
        self.transition_buffer_seconds = seconds;
        self
    }

    /// Set how many dominant colours are reported per scene.
    #[must_use]
    pub fn with_top_color_count(mut self, count: usize) -> Self {
        self.top_color_count = count;
        self
    }

    /// Set the blur threshold.
    #[must_use]
    pub fn with_blur_threshold(mut self, threshold: f64) -> Self {
        self.blur_threshold = threshold;
        self
    }

    /// Set the frame dimensions used for black/white pixel fractions.
    #[must_use]
    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_size = (width, height);
        self
    }

    /// Set the moving-frame fraction below which a scene is static.
    #[must_use]
    pub fn with_static_fraction_threshold(mut self, threshold: f64) -> Self {
        self.static_fraction_threshold = threshold;
        self
    }

    /// Pixel area of one frame.
    pub fn frame_pixel_area(&self) -> f64 {
        f64::from(self.frame_size.0) * f64::from(self.frame_size.1)
    }

    /// Check that every option is inside its valid domain.
    pub fn validate(&self) -> Result<(), FeatureError> {
        let non_negative = [
            ("motion_threshold", self.motion_threshold),
            ("transition_buffer_seconds", self.transition_buffer_seconds),
            ("blur_threshold", self.blur_threshold),
            ("static_fraction_threshold", self.static_fraction_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FeatureError::InvalidOptions(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.top_color_count == 0 {
            return Err(FeatureError::InvalidOptions(
                "top_color_count must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration for multi-video batch runs.
///
/// All fields have sensible defaults: default feature options, no progress
/// callback, a progress report after every video.
#[derive(Clone)]
pub struct BatchOptions {
    /// Options forwarded to every scene extraction.
    pub(crate) features: FeatureOptions,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Whether `progress` was set by the caller.
    has_progress: bool,
    /// How often to fire the progress callback (every N videos).
    pub(crate) batch_size: u64,
}

impl Debug for BatchOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BatchOptions")
            .field("features", &self.features)
            .field("has_progress", &self.has_progress)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOptions {
    /// Create a batch configuration with default settings.
    pub fn new() -> Self {
        Self {
            features: FeatureOptions::default(),
            progress: Arc::new(NoOpProgress),
            has_progress: false,
            batch_size: 1,
        }
    }

    /// Set the feature options used for every scene.
    #[must_use]
    pub fn with_features(mut self, features: FeatureOptions) -> Self {
        self.features = features;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self.has_progress = true;
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every video; 10 means every 10th video.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The feature options used for every scene.
    pub fn features(&self) -> &FeatureOptions {
        &self.features
    }
}
