use eframe::egui::{Pos2, Rect, pos2};

use super::curve::{CubicSegment, monotone_x};
use super::scale::LinearScale;
use crate::config::{ChartConfig, Margins};
use crate::data::model::{TemperatureDataset, TemperatureRecord};

/// Approximate tick count for both axes.
pub const TICK_COUNT: usize = 10;

/// Scales and fixed positions for one dataset on one canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub x: LinearScale,
    pub y: LinearScale,
}

impl ChartLayout {
    pub fn new(dataset: &TemperatureDataset, config: &ChartConfig) -> Self {
        let m = config.margins;
        let (year_lo, year_hi) = dataset.year_range();
        let (tas_lo, tas_hi) = dataset.tas_range();

        let x = LinearScale::new(
            (f64::from(year_lo), f64::from(year_hi)),
            (m.left, config.width - m.right),
        );
        let y = LinearScale::new(
            (tas_lo - config.y_padding, tas_hi + config.y_padding),
            (config.height - m.bottom, m.top),
        );

        Self {
            width: config.width,
            height: config.height,
            margins: m,
            x,
            y,
        }
    }

    /// Screen position of a record.
    pub fn project(&self, rec: &TemperatureRecord) -> Pos2 {
        pos2(self.x.to_px(f64::from(rec.year)), self.y.to_px(rec.tas_k))
    }

    /// The area inside the margins.
    pub fn plot_rect(&self) -> Rect {
        Rect::from_min_max(
            pos2(self.margins.left, self.margins.top),
            pos2(
                self.width - self.margins.right,
                self.height - self.margins.bottom,
            ),
        )
    }

    /// Smoothed line through all records, in x order.
    pub fn line_segments(&self, dataset: &TemperatureDataset) -> Vec<CubicSegment> {
        let mut points: Vec<Pos2> = dataset.records().iter().map(|r| self.project(r)).collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        monotone_x(&points)
    }

    /// `(pixel x, label)` for each whole-year x tick.
    pub fn x_ticks(&self) -> Vec<(f32, String)> {
        self.x
            .ticks(TICK_COUNT)
            .into_iter()
            .filter(|v| (v - v.round()).abs() < 1e-9)
            .map(|v| (self.x.to_px(v), format!("{}", v.round() as i64)))
            .collect()
    }

    /// `(pixel y, label)` for each y tick.
    pub fn y_ticks(&self) -> Vec<(f32, String)> {
        let precision = self.y.tick_precision(TICK_COUNT);
        self.y
            .ticks(TICK_COUNT)
            .into_iter()
            .map(|v| (self.y.to_px(v), format!("{v:.precision$}")))
            .collect()
    }

    /// Top-left of the legend block.
    pub fn legend_origin(&self) -> Pos2 {
        pos2(
            self.width - self.margins.right - 150.0,
            self.margins.top - 25.0,
        )
    }

    /// Where the tooltip box goes for a marker at `marker`, kept on canvas.
    pub fn tooltip_anchor(&self, marker: Pos2, offset: f32, box_size: (f32, f32)) -> Pos2 {
        let max_x = (self.width - box_size.0).max(0.0);
        let max_y = (self.height - box_size.1).max(0.0);
        pos2(
            (marker.x + offset).clamp(0.0, max_x),
            (marker.y + offset).clamp(0.0, max_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn scales_follow_margins_and_padding() {
        let layout = ChartLayout::new(&dataset(), &ChartConfig::default());
        assert_eq!(layout.x.range, (80.0, 840.0));
        assert_eq!(layout.y.range, (440.0, 50.0));
        assert_abs_diff_eq!(layout.y.domain.0, 288.2, epsilon = 1e-9);
        assert_abs_diff_eq!(layout.y.domain.1, 289.4, epsilon = 1e-9);
    }

    #[test]
    fn edge_years_land_on_plot_edges() {
        let ds = dataset();
        let layout = ChartLayout::new(&ds, &ChartConfig::default());
        let first = layout.project(&ds.records()[0]);
        let last = layout.project(&ds.records()[2]);
        assert_abs_diff_eq!(first.x, 80.0);
        assert_abs_diff_eq!(last.x, 840.0);
        assert!(last.y < first.y);
        assert!(layout.plot_rect().contains(first));
    }

    #[test]
    fn line_has_one_segment_per_gap() {
        let ds = dataset();
        let layout = ChartLayout::new(&ds, &ChartConfig::default());
        assert_eq!(layout.line_segments(&ds).len(), 2);
    }

    #[test]
    fn tick_labels() {
        let layout = ChartLayout::new(&dataset(), &ChartConfig::default());
        let x_labels: Vec<String> = layout.x_ticks().into_iter().map(|(_, l)| l).collect();
        assert!(x_labels.contains(&"2015".to_string()));
        let y_labels: Vec<String> = layout.y_ticks().into_iter().map(|(_, l)| l).collect();
        assert!(y_labels.iter().all(|l| l.contains('.')));
    }

    #[test]
    fn tooltip_stays_on_canvas() {
        let layout = ChartLayout::new(&dataset(), &ChartConfig::default());
        let anchor = layout.tooltip_anchor(pos2(840.0, 440.0), 80.0, (90.0, 40.0));
        assert_abs_diff_eq!(anchor.x, 810.0);
        assert_abs_diff_eq!(anchor.y, 460.0);
        let anchor = layout.tooltip_anchor(pos2(100.0, 100.0), 80.0, (90.0, 40.0));
        assert_eq!(anchor, pos2(180.0, 180.0));
    }
}
