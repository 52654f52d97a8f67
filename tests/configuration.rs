//! FeatureOptions and BatchOptions tests.

use std::sync::Arc;

use scene_features::{BatchOptions, FeatureError, FeatureOptions, ProgressCallback, ProgressInfo};

// ── FeatureOptions ─────────────────────────────────────────────────

#[test]
fn feature_defaults() {
    let options = FeatureOptions::new();
    assert_eq!(options.motion_threshold, 1.0);
    assert!(!options.remove_transitions);
    assert_eq!(options.transition_buffer_seconds, 1.0);
    assert_eq!(options.top_color_count, 10);
    assert_eq!(options.blur_threshold, 100.0);
    assert_eq!(options.frame_size, (480, 360));
    assert_eq!(options.static_fraction_threshold, 0.25);
    assert_eq!(options.frame_pixel_area(), 172_800.0);
    assert_eq!(options, FeatureOptions::default());
    assert!(options.validate().is_ok());
}

#[test]
fn feature_builders() {
    let options = FeatureOptions::new()
        .with_motion_threshold(2.0)
        .with_remove_transitions(true)
        .with_transition_buffer_seconds(0.5)
        .with_top_color_count(3)
        .with_blur_threshold(60.0)
        .with_frame_size(1920, 1080)
        .with_static_fraction_threshold(0.1);

    assert_eq!(options.motion_threshold, 2.0);
    assert!(options.remove_transitions);
    assert_eq!(options.transition_buffer_seconds, 0.5);
    assert_eq!(options.top_color_count, 3);
    assert_eq!(options.blur_threshold, 60.0);
    assert_eq!(options.frame_pixel_area(), 1920.0 * 1080.0);
    assert_eq!(options.static_fraction_threshold, 0.1);
}

#[test]
fn feature_validation_rejects_bad_values() {
    let invalid = [
        FeatureOptions::new().with_motion_threshold(-1.0),
        FeatureOptions::new().with_motion_threshold(f64::NAN),
        FeatureOptions::new().with_transition_buffer_seconds(f64::INFINITY),
        FeatureOptions::new().with_blur_threshold(-0.5),
        FeatureOptions::new().with_static_fraction_threshold(-0.25),
        FeatureOptions::new().with_top_color_count(0),
    ];
    for options in invalid {
        match options.validate() {
            Err(FeatureError::InvalidOptions(message)) => assert!(!message.is_empty()),
            other => panic!("Expected InvalidOptions for {options:?}, got {other:?}"),
        }
    }
}

#[test]
fn zero_frame_size_is_valid_configuration() {
    // A zero area only fails when a pixel fraction is computed.
    let options = FeatureOptions::new().with_frame_size(0, 0);
    assert!(options.validate().is_ok());
    assert_eq!(options.frame_pixel_area(), 0.0);
}

// ── BatchOptions ───────────────────────────────────────────────────

#[test]
fn batch_defaults() {
    let options = BatchOptions::new();
    let debug = format!("{options:?}");
    assert!(debug.contains("BatchOptions"));
    assert!(debug.contains("batch_size: 1"));
    assert_eq!(*options.features(), FeatureOptions::default());
}

#[test]
fn batch_with_batch_size() {
    let options = BatchOptions::new().with_batch_size(10);
    let debug = format!("{options:?}");
    assert!(debug.contains("batch_size: 10"));
}

#[test]
fn batch_with_batch_size_clamps_zero() {
    let options = BatchOptions::new().with_batch_size(0);
    let debug = format!("{options:?}");
    // Clamped to 1.
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn batch_with_features_and_progress() {
    struct Silent;
    impl ProgressCallback for Silent {
        fn on_progress(&self, _info: &ProgressInfo) {}
    }

    assert!(format!("{:?}", BatchOptions::new()).contains("has_progress: false"));

    let features = FeatureOptions::new().with_top_color_count(4);
    let options = BatchOptions::new()
        .with_features(features)
        .with_progress(Arc::new(Silent));
    assert_eq!(options.features().top_color_count, 4);
    assert!(format!("{options:?}").contains("has_progress: true"));
}
