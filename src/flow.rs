//! Optical-flow derivations.
//!
//! Pure functions over a [`FlowPointRow`]. Non-finite coordinates propagate
//! into the results unchanged; point validity is the producer's concern.

use std::f64::consts::PI;

use crate::table::FlowPointRow;

/// Euclidean distance a point travelled between the two frames.
pub fn distance(row: &FlowPointRow) -> f64 {
    let dx = row.position_curr.x - row.position_prev.x;
    let dy = row.position_curr.y - row.position_prev.y;
    (dx * dx + dy * dy).sqrt()
}

/// Direction of travel in radians, in `(-π, π]`.
pub fn angle(row: &FlowPointRow) -> f64 {
    let dx = row.position_curr.x - row.position_prev.x;
    let dy = row.position_curr.y - row.position_prev.y;
    let angle = dy.atan2(dx);
    // atan2 yields -π for a negative-zero dy; fold it onto π.
    if angle == -PI { PI } else { angle }
}

/// Distance and angle of one flow row, with the frame and time it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowMotion {
    /// Current frame number.
    pub frame_number: u64,
    /// Presentation time of the current frame.
    pub time: f64,
    /// See [`distance`].
    pub distance: f64,
    /// See [`angle`].
    pub angle: f64,
}

impl FlowMotion {
    /// Derive the motion of a single row.
    pub fn from_row(row: &FlowPointRow) -> Self {
        Self {
            frame_number: row.frame_number,
            time: row.time,
            distance: distance(row),
            angle: angle(row),
        }
    }
}
