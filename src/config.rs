use std::time::Duration;

use palette::Srgb;

use crate::data::model::DEFAULT_BASELINE_YEAR;

/// Pixel margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 60.0,
            bottom: 60.0,
            left: 80.0,
        }
    }
}

/// Look and feel of the chart plus the comparison baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub baseline_year: i32,
    /// Kelvin added below the minimum and above the maximum of the y domain.
    pub y_padding: f64,
    pub transition: Duration,
    pub marker_radius: f32,
    /// Tooltip is drawn this many pixels right of and below the marker.
    pub tooltip_offset: f32,
    pub gradient_start: Srgb<u8>,
    pub gradient_end: Srgb<u8>,
    pub legend_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 500.0,
            margins: Margins::default(),
            baseline_year: DEFAULT_BASELINE_YEAR,
            y_padding: 0.3,
            transition: Duration::from_millis(300),
            marker_radius: 6.0,
            tooltip_offset: 80.0,
            gradient_start: Srgb::new(0x4f, 0xac, 0xfe),
            gradient_end: Srgb::new(0x00, 0xf2, 0xfe),
            legend_label: "Yearly Average".to_string(),
        }
    }
}
