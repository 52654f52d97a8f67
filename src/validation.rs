//! Input table validation.
//!
//! Provides [`validate_tables`] which inspects a video's quality and flow
//! tables and returns a [`ValidationReport`] describing their structure and
//! any problems that would make extraction fail or produce doubtful numbers.
//!
//! # Example
//!
//! ```
//! use scene_features::{validate_tables, FrameQualityRow};
//!
//! let quality = vec![FrameQualityRow::new(0, 0.0, 120.0), FrameQualityRow::new(1, 0.04, 118.0)];
//! let report = validate_tables(&quality, &[]);
//! if report.is_valid() {
//!     println!("Tables are valid");
//! } else {
//!     for error in &report.errors {
//!         println!("Error: {error}");
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::histogram::{HistogramSpec, decode_channel};
use crate::segment::split_scenes;
use crate::table::{FlowPointRow, FrameQualityRow};

/// Summary of table validation.
///
/// Contains lists of informational notices, warnings, and errors found
/// during validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Issues that do not stop extraction but may skew features.
    pub warnings: Vec<String>,
    /// Issues that will make extraction fail.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found.
    ///
    /// Warnings do not affect this result; only errors make the report
    /// invalid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of issues (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run validation checks on one video's tables.
pub fn validate_tables(quality: &[FrameQualityRow], flow: &[FlowPointRow]) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Quality table ──────────────────────────────────────────────
    if quality.is_empty() {
        report
            .errors
            .push("Quality table is empty; the video has no frames".to_string());
    }

    match split_scenes(quality) {
        Ok(ranges) if !quality.is_empty() => report.info.push(format!(
            "{} frames in {} scene(s)",
            quality.len(),
            ranges.len(),
        )),
        Ok(_) => {}
        Err(error) => report.errors.push(error.to_string()),
    }

    if let Some(position) = quality
        .windows(2)
        .position(|pair| pair[1].time < pair[0].time)
    {
        report.warnings.push(format!(
            "Frame times decrease at row {}; scene durations may be wrong",
            position + 1,
        ));
    }

    let negative_blur = quality.iter().filter(|row| row.blur < 0.0).count();
    if negative_blur > 0 {
        report
            .warnings
            .push(format!("{negative_blur} frame(s) have a negative blur value"));
    }

    if quality.last().is_some_and(|row| row.is_scene_transition) {
        report
            .info
            .push("Last frame is flagged as a transition; no trailing scene is created".to_string());
    }

    // ── Histograms ─────────────────────────────────────────────────
    for spec in [HistogramSpec::HUE, HistogramSpec::SATURATION, HistogramSpec::VALUE] {
        let mismatched = quality
            .iter()
            .filter(|row| row.histogram(spec.channel).bins.len() != spec.bin_count)
            .count();
        if mismatched > 0 {
            report.warnings.push(format!(
                "{mismatched} frame(s) do not have {} {} bins",
                spec.bin_count, spec.channel,
            ));
        }

        let malformed = quality
            .iter()
            .flat_map(|row| row.histogram(spec.channel).bins.iter())
            .find(|bin| decode_channel(spec.channel, &bin.name).is_err());
        if let Some(bin) = malformed {
            report.errors.push(format!(
                "Malformed or misplaced {} bin name {:?}",
                spec.channel, bin.name,
            ));
        }
    }

    // ── Flow table ─────────────────────────────────────────────────
    let non_finite = flow
        .iter()
        .filter(|row| {
            ![
                row.position_prev.x,
                row.position_prev.y,
                row.position_curr.x,
                row.position_curr.y,
            ]
            .iter()
            .all(|value| value.is_finite())
        })
        .count();
    if non_finite > 0 {
        report.warnings.push(format!(
            "{non_finite} flow row(s) have non-finite positions; flow statistics will be NaN"
        ));
    }

    if let (Some(first), Some(last)) = (quality.first(), quality.last()) {
        let outside = flow
            .iter()
            .filter(|row| row.frame_number < first.frame_number || row.frame_number > last.frame_number)
            .count();
        if outside > 0 {
            report.errors.push(format!(
                "{outside} flow row(s) reference frames outside {}..={}",
                first.frame_number, last.frame_number,
            ));
        }
    }

    if let Some(position) = flow
        .windows(2)
        .position(|pair| pair[1].frame_number < pair[0].frame_number)
    {
        report.errors.push(format!(
            "Flow frame numbers are out of order at row {}",
            position + 1,
        ));
    }

    report.info.push(format!("{} flow row(s)", flow.len()));

    report
}
