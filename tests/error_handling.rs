//! Error handling integration tests.
//!
//! These tests verify that errors carry enough context to locate the
//! offending scene or row.

use std::error::Error;

use scene_features::{
    FeatureError, FeatureOptions, FrameQualityRow, SceneFailure, TableKind, analyze_video,
};

#[test]
fn empty_scene_message() {
    let error = FeatureError::EmptyScene {
        scene_index: 2,
        begin_frame: 30,
        end_frame: 30,
    };
    assert_eq!(error.to_string(), "Scene 2 [30, 30) has no quality rows");
}

#[test]
fn flow_out_of_range_message() {
    let error = FeatureError::FlowFrameOutOfRange {
        frame_number: 99,
        begin_frame: 10,
        end_frame: 20,
    };
    let message = error.to_string();
    assert!(message.contains("99"), "{message}");
    assert!(message.contains("[10, 20)"), "{message}");
}

#[test]
fn malformed_bin_name_message_quotes_name() {
    let error = FeatureError::MalformedBinName("hue_bin_x".to_string());
    assert_eq!(error.to_string(), "Malformed histogram bin name: \"hue_bin_x\"");
}

#[test]
fn unordered_frames_message_names_table() {
    let error = FeatureError::UnorderedFrames {
        table: TableKind::Flow,
        position: 3,
        previous: 8,
        current: 5,
    };
    let message = error.to_string();
    assert!(message.contains("flow table"), "{message}");
    assert!(message.contains("row 3"), "{message}");
}

#[test]
fn degenerate_division_names_quantity() {
    let error = FeatureError::DegenerateDivision {
        quantity: "black pixel fraction",
    };
    assert!(error.to_string().contains("black pixel fraction"));
}

#[test]
fn scene_failure_exposes_source() {
    let quality: Vec<_> = (0..3)
        .map(|frame| FrameQualityRow::new(frame, frame as f64, 120.0))
        .collect();
    let options = FeatureOptions::new().with_frame_size(0, 0);
    let analysis = analyze_video("clip-9", &quality, &[], &options).expect("ordered input");

    let failure: &SceneFailure = &analysis.failures[0];
    let message = failure.to_string();
    assert!(message.starts_with("Video \"clip-9\" scene 0 [0, 3)"), "{message}");

    let source = failure.source().expect("failure has a source");
    assert!(source.to_string().contains("Division by zero"));
}

#[test]
fn errors_are_cloneable_and_comparable() {
    let error = FeatureError::InvalidOptions("top_color_count must be greater than zero".into());
    assert_eq!(error.clone(), error);
}
