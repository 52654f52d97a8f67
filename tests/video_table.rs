//! Per-video and batch aggregation tests.

use std::sync::{Arc, Mutex};

use scene_features::{
    BatchOptions, FeatureError, FeatureOptions, FlowPointRow, FrameQualityRow, Histogram,
    HistogramBin, ProgressCallback, ProgressInfo, TableKind, VideoInput, analyze_batch,
    analyze_video,
};

fn video(count: u64, transitions: &[u64]) -> Vec<FrameQualityRow> {
    (0..count)
        .map(|frame| {
            FrameQualityRow::new(frame, frame as f64 / 10.0, 120.0)
                .with_transition(transitions.contains(&frame))
        })
        .collect()
}

fn broken_saturation(row: FrameQualityRow) -> FrameQualityRow {
    row.with_histograms(
        Histogram::default(),
        Histogram {
            bins: vec![HistogramBin {
                name: "sat_bin_?".to_string(),
                count: 1,
            }],
        },
        Histogram::default(),
    )
}

// ── Single video ───────────────────────────────────────────────────

#[test]
fn rows_are_tagged_and_ordered() {
    let quality = video(12, &[3, 7]);
    let analysis = analyze_video("clip", &quality, &[], &FeatureOptions::new()).expect("analyze");

    assert!(analysis.is_complete());
    assert_eq!(analysis.scene_count, 3);
    assert_eq!(analysis.table.video_id, "clip");
    assert_eq!(analysis.table.len(), 3);

    let ranges: Vec<_> = analysis
        .table
        .iter()
        .map(|row| (row.scene_index, row.begin_frame, row.end_frame))
        .collect();
    assert_eq!(ranges, vec![(0, 0, 4), (1, 4, 8), (2, 8, 12)]);
    assert!(analysis.table.iter().all(|row| row.video_id == "clip"));
    assert_eq!(analysis.table.rows[1].features.frame_count, 4);
}

#[test]
fn failed_scene_does_not_drop_neighbours() {
    let mut quality = video(9, &[2, 5]);
    quality[4] = broken_saturation(quality[4].clone());

    let analysis = analyze_video("clip", &quality, &[], &FeatureOptions::new()).expect("analyze");

    assert!(!analysis.is_complete());
    assert_eq!(analysis.scene_count, 3);
    assert_eq!(analysis.table.len(), 2);
    assert_eq!(analysis.table.rows[0].scene_index, 0);
    assert_eq!(analysis.table.rows[1].scene_index, 2);

    assert_eq!(analysis.failures.len(), 1);
    let failure = &analysis.failures[0];
    assert_eq!(failure.video_id, "clip");
    assert_eq!(failure.scene_index, 1);
    assert_eq!((failure.begin_frame, failure.end_frame), (3, 6));
    assert_eq!(
        failure.error,
        FeatureError::MalformedBinName("sat_bin_?".to_string())
    );
}

#[test]
fn stray_flow_fails_only_its_scene() {
    let quality = video(6, &[2]);
    let flow = vec![
        FlowPointRow::new(1, 0.1, (0.0, 0.0), (2.0, 0.0)),
        FlowPointRow::new(9, 0.9, (0.0, 0.0), (2.0, 0.0)),
    ];
    let analysis = analyze_video("clip", &quality, &flow, &FeatureOptions::new()).expect("analyze");

    assert_eq!(analysis.table.len(), 1);
    assert_eq!(analysis.table.rows[0].scene_index, 0);
    assert!(matches!(
        analysis.failures[0].error,
        FeatureError::FlowFrameOutOfRange { frame_number: 9, .. }
    ));
}

#[test]
fn empty_video_reports_empty_scene() {
    let analysis = analyze_video("empty", &[], &[], &FeatureOptions::new()).expect("analyze");
    assert!(analysis.table.is_empty());
    assert_eq!(analysis.scene_count, 1);
    assert!(matches!(
        analysis.failures[0].error,
        FeatureError::EmptyScene { .. }
    ));
}

#[test]
fn invalid_options_reject_video() {
    let options = FeatureOptions::new().with_top_color_count(0);
    let result = analyze_video("clip", &video(3, &[]), &[], &options);
    assert!(matches!(result, Err(FeatureError::InvalidOptions(_))));
}

#[test]
fn scene_rows_serialize_flat() {
    let analysis =
        analyze_video("clip", &video(3, &[]), &[], &FeatureOptions::new()).expect("analyze");
    let value = serde_json::to_value(&analysis.table.rows[0]).expect("serialize");
    assert_eq!(value["video_id"], "clip");
    assert_eq!(value["scene_index"], 0);
    assert_eq!(value["frame_count"], 3);
    assert!(value["flow_percentile_50"].is_null());
}

// ── Batch ──────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingProgress {
    seen: Mutex<Vec<(u64, Option<String>)>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((info.current, info.current_video.clone()));
        }
    }
}

fn inputs() -> Vec<VideoInput> {
    let mut unordered = video(4, &[]);
    unordered.swap(1, 2);
    vec![
        VideoInput {
            video_id: "a".to_string(),
            quality: video(5, &[1]),
            flow: Vec::new(),
        },
        VideoInput {
            video_id: "b".to_string(),
            quality: unordered,
            flow: Vec::new(),
        },
        VideoInput {
            video_id: "c".to_string(),
            quality: video(3, &[]),
            flow: vec![FlowPointRow::new(1, 0.1, (0.0, 0.0), (5.0, 0.0))],
        },
    ]
}

#[test]
fn batch_keeps_going_after_rejection() {
    let report = analyze_batch(&inputs(), &BatchOptions::new());

    assert_eq!(report.videos.len(), 2);
    assert_eq!(report.videos[0].table.video_id, "a");
    assert_eq!(report.videos[1].table.video_id, "c");
    assert_eq!(report.rows().count(), 3);
    assert_eq!(report.scene_failures().count(), 0);

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].video_id, "b");
    assert!(matches!(
        report.rejected[0].error,
        FeatureError::UnorderedFrames {
            table: TableKind::Quality,
            ..
        }
    ));
    assert!(!report.is_complete());
}

#[test]
fn batch_reports_progress_per_video() {
    let progress = Arc::new(RecordingProgress::default());
    let options = BatchOptions::new().with_progress(progress.clone());
    analyze_batch(&inputs(), &options);

    let seen = progress.seen.lock().expect("lock");
    assert_eq!(
        *seen,
        vec![
            (1, Some("a".to_string())),
            (2, Some("b".to_string())),
            (3, Some("c".to_string())),
        ]
    );
}

#[test]
fn batch_uses_configured_features() {
    let strict = FeatureOptions::new().with_motion_threshold(10.0);
    let report = analyze_batch(&inputs(), &BatchOptions::new().with_features(strict));
    let last = report.rows().last().expect("rows");
    assert_eq!(last.video_id, "c");
    assert!(last.features.is_static);

    let report = analyze_batch(&inputs(), &BatchOptions::new());
    let last = report.rows().last().expect("rows");
    assert!(!last.features.is_static);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_batch_matches_sequential() {
    let sequential = analyze_batch(&inputs(), &BatchOptions::new());
    let parallel = scene_features::analyze_batch_parallel(&inputs(), &BatchOptions::new());
    assert_eq!(sequential, parallel);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_video_matches_sequential() {
    let mut quality = video(30, &[4, 9, 17, 25]);
    quality[12] = broken_saturation(quality[12].clone());
    let options = FeatureOptions::new();

    let sequential = analyze_video("clip", &quality, &[], &options).expect("analyze");
    let parallel =
        scene_features::analyze_video_parallel("clip", &quality, &[], &options).expect("analyze");
    assert_eq!(sequential, parallel);
}
