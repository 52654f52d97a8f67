//! Scene segmentation tests.

use scene_features::{FeatureError, FlowPointRow, FrameQualityRow, TableKind, scenes, split_scenes};

/// Frames `0..count` at 10 fps with transitions after the listed frames.
fn video(count: u64, transitions: &[u64]) -> Vec<FrameQualityRow> {
    (0..count)
        .map(|frame| {
            FrameQualityRow::new(frame, frame as f64 / 10.0, 120.0)
                .with_transition(transitions.contains(&frame))
        })
        .collect()
}

fn bounds(quality: &[FrameQualityRow]) -> Vec<(u64, u64)> {
    split_scenes(quality)
        .expect("ordered frames")
        .iter()
        .map(|range| (range.begin_frame, range.end_frame))
        .collect()
}

// ── Ranges ─────────────────────────────────────────────────────────

#[test]
fn five_frame_example() {
    assert_eq!(bounds(&video(5, &[2])), vec![(0, 3), (3, 5)]);
}

#[test]
fn no_transitions_is_one_scene() {
    assert_eq!(bounds(&video(8, &[])), vec![(0, 8)]);
}

#[test]
fn flagged_last_frame_adds_no_scene() {
    assert_eq!(bounds(&video(6, &[1, 5])), vec![(0, 2), (2, 6)]);
}

#[test]
fn consecutive_transitions_make_single_frame_scenes() {
    assert_eq!(
        bounds(&video(5, &[0, 1, 2])),
        vec![(0, 1), (1, 2), (2, 3), (3, 5)]
    );
}

#[test]
fn ranges_cover_every_frame_without_gaps() {
    let quality = video(40, &[3, 9, 10, 27, 39]);
    let ranges = split_scenes(&quality).expect("ordered frames");

    assert_eq!(ranges.len(), 5);
    assert_eq!(ranges[0].begin_frame, 0);
    assert_eq!(ranges.last().map(|range| range.end_frame), Some(40));
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].end_frame, pair[1].begin_frame);
    }
    let covered: usize = ranges.iter().map(|range| range.rows.len()).sum();
    assert_eq!(covered, quality.len());
    for (index, range) in ranges.iter().enumerate() {
        assert_eq!(range.index, index);
    }
}

#[test]
fn scene_count_is_transitions_plus_one() {
    for transitions in [vec![], vec![4], vec![4, 11], vec![0, 4, 11, 18]] {
        let quality = video(20, &transitions);
        let ranges = split_scenes(&quality).expect("ordered frames");
        assert_eq!(ranges.len(), transitions.len() + 1);
    }
}

#[test]
fn first_scene_starts_at_first_frame_number() {
    let quality: Vec<_> = (100..104)
        .map(|frame| FrameQualityRow::new(frame, frame as f64, 120.0).with_transition(frame == 101))
        .collect();
    assert_eq!(bounds(&quality), vec![(100, 102), (102, 104)]);
}

#[test]
fn empty_table_is_one_empty_scene() {
    let ranges = split_scenes(&[]).expect("empty is ordered");
    assert_eq!(ranges.len(), 1);
    assert_eq!((ranges[0].begin_frame, ranges[0].end_frame), (0, 0));
    assert!(ranges[0].rows.is_empty());
}

#[test]
fn unordered_quality_frames_are_rejected() {
    let mut quality = video(4, &[]);
    quality[2].frame_number = 1;
    assert_eq!(
        split_scenes(&quality),
        Err(FeatureError::UnorderedFrames {
            table: TableKind::Quality,
            position: 2,
            previous: 1,
            current: 1,
        })
    );
}

// ── Flow assignment ────────────────────────────────────────────────

#[test]
fn flow_rows_follow_their_frames() {
    let quality = video(6, &[2]);
    let flow = vec![
        FlowPointRow::new(1, 0.1, (0.0, 0.0), (1.0, 0.0)),
        FlowPointRow::new(2, 0.2, (0.0, 0.0), (1.0, 0.0)),
        FlowPointRow::new(3, 0.3, (0.0, 0.0), (1.0, 0.0)),
        FlowPointRow::new(5, 0.5, (0.0, 0.0), (1.0, 0.0)),
    ];
    let scenes = scenes(&quality, &flow).expect("ordered tables");

    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0].flow.len(), 2);
    assert_eq!(scenes[1].flow.len(), 2);
    assert_eq!(scenes[0].quality.len(), 3);
    assert_eq!(scenes[1].quality.len(), 3);
    assert!(scenes.iter().all(|scene| scene.flow.iter().all(|row| scene.contains(row.frame_number))));
}

#[test]
fn stray_flow_rows_stay_with_edge_scenes() {
    let quality: Vec<_> = (10..16)
        .map(|frame| FrameQualityRow::new(frame, frame as f64, 120.0).with_transition(frame == 12))
        .collect();
    let flow = vec![
        FlowPointRow::new(3, 3.0, (0.0, 0.0), (1.0, 0.0)),
        FlowPointRow::new(11, 11.0, (0.0, 0.0), (1.0, 0.0)),
        FlowPointRow::new(20, 20.0, (0.0, 0.0), (1.0, 0.0)),
    ];
    let scenes = scenes(&quality, &flow).expect("ordered tables");

    assert_eq!(scenes[0].flow.len(), 2);
    assert_eq!(scenes[0].flow[0].frame_number, 3);
    assert_eq!(scenes[1].flow.len(), 1);
    assert_eq!(scenes[1].flow[0].frame_number, 20);
}

#[test]
fn unordered_flow_frames_are_rejected() {
    let quality = video(4, &[]);
    let flow = vec![
        FlowPointRow::new(2, 0.2, (0.0, 0.0), (1.0, 0.0)),
        FlowPointRow::new(1, 0.1, (0.0, 0.0), (1.0, 0.0)),
    ];
    assert!(matches!(
        scenes(&quality, &flow),
        Err(FeatureError::UnorderedFrames {
            table: TableKind::Flow,
            position: 1,
            ..
        })
    ));
}
