use std::fmt;

use eframe::egui::{Pos2, pos2};

use crate::chart::layout::ChartLayout;
use crate::data::model::{TemperatureDataset, TemperatureRecord};

// ---------------------------------------------------------------------------
// ViewState – everything the interactive overlay shows
// ---------------------------------------------------------------------------

/// Display state derived from one slider value. Rebuilt from scratch on every
/// update; renderers only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Year the slider asked for, before resolution.
    pub requested_year: f64,
    /// Nearest record to `requested_year`.
    pub record: TemperatureRecord,
    /// Where the marker is heading, in canvas pixels.
    pub marker_target: Pos2,
    pub tooltip: Tooltip,
    pub status: StatusLine,
    pub year_label: String,
    /// Cleared when the pointer leaves the chart, set again by the next update.
    pub marker_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub body: String,
}

impl ViewState {
    pub fn compute(
        dataset: &TemperatureDataset,
        layout: &ChartLayout,
        requested_year: f64,
    ) -> Self {
        let record = *dataset.resolve(requested_year);
        let diff = dataset.diff_from_baseline(&record);

        Self {
            requested_year,
            record,
            marker_target: layout.project(&record),
            tooltip: Tooltip {
                title: record.year.to_string(),
                body: format_kelvin(record.tas_k),
            },
            status: StatusLine {
                year: record.year,
                temperature: format_kelvin(record.tas_k),
                difference: format_signed_kelvin(diff),
                baseline_year: dataset.baseline_year(),
            },
            year_label: record.year.to_string(),
            marker_visible: true,
        }
    }

    /// Same state with marker and tooltip hidden; the resolved record stays.
    pub fn hidden(&self) -> Self {
        Self {
            marker_visible: false,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Status sentence
// ---------------------------------------------------------------------------

/// "Global temperature in 2016 was 289.10 K (+0.40 K vs. 2015)".
///
/// Kept as parts so the UI can embolden the year and temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub year: i32,
    pub temperature: String,
    pub difference: String,
    pub baseline_year: i32,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Global temperature in {} was {} ({} vs. {})",
            self.year, self.temperature, self.difference, self.baseline_year
        )
    }
}

/// `289.1` → `"289.10 K"`.
pub fn format_kelvin(v: f64) -> String {
    format!("{v:.2} K")
}

/// Signed to two decimals with an explicit `+` for non-negative values.
///
/// The sign follows the unrounded difference, so a small negative value
/// prints as `-0.00 K`. Only an exact zero (either sign) prints `+0.00 K`.
pub fn format_signed_kelvin(diff: f64) -> String {
    let diff = if diff == 0.0 { 0.0 } else { diff };
    let sign = if diff >= 0.0 { "+" } else { "" };
    format!("{sign}{diff:.2} K")
}

// ---------------------------------------------------------------------------
// Marker animation
// ---------------------------------------------------------------------------

/// Cubic ease-out: fast start, gentle stop.
pub fn ease_cubic_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}

/// Time-based move of the marker between two canvas positions.
///
/// Times are seconds on the UI clock (`egui::InputState::time`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerTransition {
    pub from: Pos2,
    pub to: Pos2,
    pub start: f64,
    pub duration: f64,
}

impl MarkerTransition {
    /// A transition that is already at rest on `at`.
    pub fn settled(at: Pos2, now: f64) -> Self {
        Self {
            from: at,
            to: at,
            start: now,
            duration: 0.0,
        }
    }

    /// Start heading to `to` from wherever the marker is right now. Any
    /// in-flight move is superseded, not queued.
    pub fn retarget(&self, to: Pos2, now: f64, duration: f64) -> Self {
        Self {
            from: self.position_at(now),
            to,
            start: now,
            duration,
        }
    }

    fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn position_at(&self, now: f64) -> Pos2 {
        let k = ease_cubic_out(self.progress(now));
        pos2(
            self.from.x + (self.to.x - self.from.x) * k,
            self.from.y + (self.to.y - self.from.y) * k,
        )
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use approx::assert_abs_diff_eq;

    fn dataset() -> TemperatureDataset {
        TemperatureDataset::from_records(
            vec![
                TemperatureRecord::new(2014, 288.50, 0.0),
                TemperatureRecord::new(2015, 288.70, 0.0),
                TemperatureRecord::new(2016, 289.10, 0.0),
            ],
            2015,
        )
        .unwrap()
    }

    fn view(requested: f64) -> ViewState {
        let ds = dataset();
        let layout = ChartLayout::new(&ds, &ChartConfig::default());
        ViewState::compute(&ds, &layout, requested)
    }

    #[test]
    fn update_2016_reports_warming_against_baseline() {
        let status = view(2016.0).status.to_string();
        assert!(status.contains("2016"));
        assert!(status.contains("289.10 K"));
        assert!(status.contains("+0.40 K"));
        assert_eq!(
            status,
            "Global temperature in 2016 was 289.10 K (+0.40 K vs. 2015)"
        );
    }

    #[test]
    fn baseline_year_compares_to_itself_as_plus_zero() {
        let v = view(2015.0);
        assert_eq!(v.status.difference, "+0.00 K");
        assert_eq!(v.year_label, "2015");
    }

    #[test]
    fn cooler_year_has_no_plus_sign() {
        let v = view(2014.0);
        assert_eq!(v.status.difference, "-0.20 K");
    }

    #[test]
    fn tooltip_and_label_follow_resolved_record() {
        let v = view(2014.5);
        assert_eq!(v.record.year, 2014);
        assert_eq!(v.tooltip.title, "2014");
        assert_eq!(v.tooltip.body, "288.50 K");
        assert_eq!(v.year_label, "2014");
        assert!(v.marker_visible);
        assert_abs_diff_eq!(v.marker_target.x, 80.0);
    }

    #[test]
    fn hiding_keeps_resolved_record() {
        let v = view(2016.0);
        let h = v.hidden();
        assert!(!h.marker_visible);
        assert_eq!(h.record, v.record);
        assert_eq!(h.status, v.status);
    }

    #[test]
    fn signed_format_edge_cases() {
        assert_eq!(format_signed_kelvin(0.0), "+0.00 K");
        assert_eq!(format_signed_kelvin(-0.0), "+0.00 K");
        assert_eq!(format_signed_kelvin(0.001), "+0.00 K");
        assert_eq!(format_signed_kelvin(-0.001), "-0.00 K");
        assert_eq!(format_signed_kelvin(-0.004_999), "-0.00 K");
        assert_eq!(format_signed_kelvin(1.234), "+1.23 K");
        assert_eq!(format_signed_kelvin(-1.236), "-1.24 K");
    }

    #[test]
    fn ease_out_is_monotone_and_bounded() {
        assert_abs_diff_eq!(ease_cubic_out(0.0), 0.0);
        assert_abs_diff_eq!(ease_cubic_out(1.0), 1.0);
        assert!(ease_cubic_out(0.5) > 0.5);
        assert_abs_diff_eq!(ease_cubic_out(2.0), 1.0);
    }

    #[test]
    fn transition_reaches_target_after_duration() {
        let t = MarkerTransition::settled(pos2(0.0, 0.0), 10.0).retarget(pos2(100.0, 50.0), 10.0, 0.3);
        assert_eq!(t.position_at(10.0), pos2(0.0, 0.0));
        assert!(!t.is_finished(10.1));
        assert_eq!(t.position_at(10.3), pos2(100.0, 50.0));
        assert!(t.is_finished(10.5));
    }

    #[test]
    fn retarget_mid_flight_starts_from_current_position() {
        let t = MarkerTransition::settled(pos2(0.0, 0.0), 0.0).retarget(pos2(100.0, 0.0), 0.0, 0.3);
        let mid = t.position_at(0.15);
        let t2 = t.retarget(pos2(0.0, 0.0), 0.15, 0.3);
        assert_eq!(t2.from, mid);
        assert_eq!(t2.position_at(0.15), mid);
        assert_eq!(t2.position_at(0.45), pos2(0.0, 0.0));
    }
}
