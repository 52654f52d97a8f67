//! Progress reporting integration tests.

use std::sync::{Arc, Mutex};

use scene_features::{
    BatchOptions, FrameQualityRow, OperationType, ProgressCallback, ProgressInfo, VideoInput,
    analyze_batch,
};

struct RecordingProgress {
    infos: Mutex<Vec<ProgressInfo>>,
}

impl RecordingProgress {
    fn new() -> Self {
        Self {
            infos: Mutex::new(Vec::new()),
        }
    }

    fn snapshot(&self) -> Vec<ProgressInfo> {
        self.infos.lock().expect("lock").clone()
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().expect("lock").push(info.clone());
    }
}

fn inputs(count: usize) -> Vec<VideoInput> {
    (0..count)
        .map(|index| VideoInput {
            video_id: format!("video-{index}"),
            quality: (0..3)
                .map(|frame| FrameQualityRow::new(frame, frame as f64 * 0.1, 120.0))
                .collect(),
            flow: Vec::new(),
        })
        .collect()
}

// ── ProgressInfo ───────────────────────────────────────────────────

#[test]
fn progress_fires_for_every_video() {
    let recorder = Arc::new(RecordingProgress::new());
    let options = BatchOptions::new().with_progress(recorder.clone());
    analyze_batch(&inputs(4), &options);

    let infos = recorder.snapshot();
    assert_eq!(infos.len(), 4);
    for (index, info) in infos.iter().enumerate() {
        assert_eq!(info.operation, OperationType::SceneExtraction);
        assert_eq!(info.current, index as u64 + 1);
        assert_eq!(info.total, Some(4));
        assert_eq!(info.current_video.as_deref(), Some(format!("video-{index}").as_str()));
    }
    assert_eq!(infos[3].percentage, Some(100.0));
    assert_eq!(infos[3].estimated_remaining, Some(std::time::Duration::ZERO));
}

#[test]
fn progress_respects_batch_size() {
    let recorder = Arc::new(RecordingProgress::new());
    let options = BatchOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(2);
    analyze_batch(&inputs(5), &options);

    let infos = recorder.snapshot();
    let currents: Vec<u64> = infos.iter().map(|info| info.current).collect();
    // Reports after videos 2 and 4, then a final one for the remainder.
    assert_eq!(currents, vec![2, 4, 5]);
    assert_eq!(infos[2].current_video, None);
}

#[test]
fn empty_batch_reports_nothing() {
    let recorder = Arc::new(RecordingProgress::new());
    let options = BatchOptions::new().with_progress(recorder.clone());
    let report = analyze_batch(&[], &options);

    assert!(report.videos.is_empty());
    assert!(report.is_complete());
    assert!(recorder.snapshot().is_empty());
}
