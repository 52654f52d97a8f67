//! Optical-flow distance and angle tests.

use std::f64::consts::{FRAC_PI_2, PI};

use scene_features::flow::{angle, distance};
use scene_features::{FlowMotion, FlowPointRow, Point};

fn row(prev: (f64, f64), curr: (f64, f64)) -> FlowPointRow {
    FlowPointRow::new(7, 0.28, prev, curr)
}

#[test]
fn distance_is_euclidean() {
    assert_eq!(distance(&row((0.0, 0.0), (3.0, 4.0))), 5.0);
    assert_eq!(distance(&row((10.0, 10.0), (10.0, 10.0))), 0.0);
    assert_eq!(distance(&row((1.0, 1.0), (-2.0, -3.0))), 5.0);
}

#[test]
fn angle_follows_atan2() {
    assert_eq!(angle(&row((0.0, 0.0), (1.0, 0.0))), 0.0);
    assert_eq!(angle(&row((0.0, 0.0), (0.0, 1.0))), FRAC_PI_2);
    assert_eq!(angle(&row((0.0, 0.0), (0.0, -1.0))), -FRAC_PI_2);
    assert_eq!(angle(&row((1.0, 0.0), (0.0, 0.0))), PI);
}

#[test]
fn angle_range_excludes_negative_pi() {
    // Moving left with a negative-zero vertical component.
    let leftward = FlowPointRow::new(1, 0.0, Point::new(1.0, 0.0), Point::new(0.0, -0.0));
    assert_eq!(angle(&leftward), PI);
}

#[test]
fn non_finite_positions_propagate() {
    assert!(distance(&row((f64::NAN, 0.0), (1.0, 1.0))).is_nan());
    assert!(angle(&row((0.0, f64::NAN), (1.0, 1.0))).is_nan());
    assert_eq!(distance(&row((0.0, 0.0), (f64::INFINITY, 0.0))), f64::INFINITY);
}

#[test]
fn motion_carries_frame_and_time() {
    let motion = FlowMotion::from_row(&row((0.0, 0.0), (0.0, 2.0)));
    assert_eq!(motion.frame_number, 7);
    assert_eq!(motion.time, 0.28);
    assert_eq!(motion.distance, 2.0);
    assert_eq!(motion.angle, FRAC_PI_2);
}
