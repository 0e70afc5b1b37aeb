//! Static SVG snapshot of the chart.
//!
//! Uses the same [`ChartLayout`] and [`ViewState`] as the on-screen painter,
//! so an export shows exactly what the window shows (minus animation).

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::chart::curve::CubicSegment;
use crate::chart::layout::ChartLayout;
use crate::color::{self, Gradient};
use crate::config::ChartConfig;
use crate::data::model::TemperatureDataset;
use crate::view::ViewState;

const GRADIENT_ID: &str = "lineGradient";
const SHADOW_ID: &str = "lineShadow";

/// Render the chart as a standalone SVG document.
pub fn render(
    dataset: &TemperatureDataset,
    layout: &ChartLayout,
    view: Option<&ViewState>,
    config: &ChartConfig,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, dataset, layout, view, config);
    out
}

/// Render and write to `path`.
pub fn export(
    path: &Path,
    dataset: &TemperatureDataset,
    layout: &ChartLayout,
    view: Option<&ViewState>,
    config: &ChartConfig,
) -> Result<()> {
    let doc = render(dataset, layout, view, config);
    std::fs::write(path, doc).with_context(|| format!("writing {}", path.display()))
}

fn write_document(
    out: &mut String,
    dataset: &TemperatureDataset,
    layout: &ChartLayout,
    view: Option<&ViewState>,
    config: &ChartConfig,
) -> std::fmt::Result {
    let (w, h) = (layout.width, layout.height);
    let plot = layout.plot_rect();
    let gradient = Gradient::new(config.gradient_start, config.gradient_end);
    let grid = color::hex(color::GRID);
    let text = color::hex(color::TEXT);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    )?;
    if let Some(view) = view {
        writeln!(out, "  <title>{}</title>", escape(&view.status.to_string()))?;
    }
    writeln!(out, r##"  <rect width="{w}" height="{h}" fill="#ffffff"/>"##)?;

    // -- gradient --
    writeln!(out, "  <defs>")?;
    writeln!(
        out,
        r#"    <linearGradient id="{GRADIENT_ID}" x1="0%" x2="100%" y1="0%" y2="0%">"#
    )?;
    writeln!(
        out,
        r#"      <stop offset="0%" stop-color="{}"/>"#,
        color::hex(gradient.start)
    )?;
    writeln!(
        out,
        r#"      <stop offset="100%" stop-color="{}"/>"#,
        color::hex(gradient.end)
    )?;
    writeln!(out, "    </linearGradient>")?;
    // CSS blur radius is twice the Gaussian standard deviation.
    writeln!(out, r#"    <filter id="{SHADOW_ID}">"#)?;
    writeln!(
        out,
        r#"      <feDropShadow dx="0" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/>"#,
        color::SHADOW_OFFSET_Y,
        color::SHADOW_BLUR / 2.0,
        color::hex(color::SHADOW),
        color::SHADOW_OPACITY
    )?;
    writeln!(out, "    </filter>")?;
    writeln!(out, "  </defs>")?;

    // -- grid --
    writeln!(
        out,
        r#"  <g class="grid" stroke="{grid}" stroke-opacity="{}">"#,
        color::GRID_OPACITY
    )?;
    for (x, _) in layout.x_ticks() {
        writeln!(
            out,
            r#"    <line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}"/>"#,
            plot.top(),
            plot.bottom()
        )?;
    }
    for (y, _) in layout.y_ticks() {
        writeln!(
            out,
            r#"    <line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}"/>"#,
            plot.left(),
            plot.right()
        )?;
    }
    writeln!(out, "  </g>")?;

    // -- main line --
    writeln!(
        out,
        r#"  <path fill="none" stroke="url(#{GRADIENT_ID})" stroke-width="3" filter="url(#{SHADOW_ID})" d="{}"/>"#,
        path_data(&layout.line_segments(dataset))
    )?;

    // -- legend --
    let legend = layout.legend_origin();
    writeln!(
        out,
        r#"  <g transform="translate({:.2},{:.2})">"#,
        legend.x, legend.y
    )?;
    writeln!(
        out,
        r#"    <rect x="0" y="-10" width="15" height="3" rx="2" fill="url(#{GRADIENT_ID})"/>"#
    )?;
    writeln!(
        out,
        r#"    <text x="25" y="0" fill="{text}" font-size="14px" font-weight="600">{}</text>"#,
        escape(&config.legend_label)
    )?;
    writeln!(out, "  </g>")?;

    // -- axes --
    writeln!(
        out,
        r#"  <g stroke="{text}" font-size="13px" fill="{text}">"#
    )?;
    writeln!(
        out,
        r#"    <line x1="{:.2}" y1="{b:.2}" x2="{:.2}" y2="{b:.2}"/>"#,
        plot.left(),
        plot.right(),
        b = plot.bottom()
    )?;
    for (x, label) in layout.x_ticks() {
        writeln!(
            out,
            r#"    <line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}"/>"#,
            plot.bottom(),
            plot.bottom() + 6.0
        )?;
        writeln!(
            out,
            r#"    <text x="{x:.2}" y="{:.2}" stroke="none" text-anchor="middle">{label}</text>"#,
            plot.bottom() + 20.0
        )?;
    }
    writeln!(
        out,
        r#"    <line x1="{l:.2}" y1="{:.2}" x2="{l:.2}" y2="{:.2}"/>"#,
        plot.top(),
        plot.bottom(),
        l = plot.left()
    )?;
    for (y, label) in layout.y_ticks() {
        writeln!(
            out,
            r#"    <line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}"/>"#,
            plot.left() - 6.0,
            plot.left()
        )?;
        writeln!(
            out,
            r#"    <text x="{:.2}" y="{y:.2}" stroke="none" text-anchor="end" dominant-baseline="middle">{label}</text>"#,
            plot.left() - 9.0
        )?;
    }
    writeln!(out, "  </g>")?;

    // -- marker & tooltip --
    if let Some(view) = view.filter(|v| v.marker_visible) {
        let m = view.marker_target;
        writeln!(
            out,
            r##"  <circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="#ffffff" stroke-width="2"/>"##,
            m.x,
            m.y,
            config.marker_radius,
            color::hex(color::MARKER_FILL)
        )?;
        let tip = layout.tooltip_anchor(m, config.tooltip_offset, TOOLTIP_BOX);
        writeln!(
            out,
            r#"  <g class="tooltip" transform="translate({:.2},{:.2})">"#,
            tip.x, tip.y
        )?;
        writeln!(
            out,
            r##"    <rect width="{}" height="{}" rx="4" fill="#ffffff" fill-opacity="0.95" stroke="{grid}"/>"##,
            TOOLTIP_BOX.0, TOOLTIP_BOX.1
        )?;
        writeln!(
            out,
            r#"    <text x="8" y="18" fill="{text}" font-size="13px"><tspan font-weight="bold">{}</tspan><tspan x="8" dy="16">{}</tspan></text>"#,
            escape(&view.tooltip.title),
            escape(&view.tooltip.body)
        )?;
        writeln!(out, "  </g>")?;
    }

    writeln!(out, "</svg>")
}

/// Size of the tooltip box in the export.
const TOOLTIP_BOX: (f32, f32) = (90.0, 44.0);

/// `M x,y C c1 c2 p ...` for a run of cubic segments.
fn path_data(segments: &[CubicSegment]) -> String {
    let mut d = String::new();
    let Some(first) = segments.first() else {
        return d;
    };
    let _ = write!(d, "M{:.2},{:.2}", first.from.x, first.from.y);
    for s in segments {
        let _ = write!(
            d,
            "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            s.ctrl1.x, s.ctrl1.y, s.ctrl2.x, s.ctrl2.y, s.to.x, s.to.y
        );
    }
    d
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TemperatureRecord;

    fn fixture() -> (TemperatureDataset, ChartLayout, ChartConfig) {
        let ds = TemperatureDataset::from_records(
            vec![
                TemperatureRecord::new(2014, 288.50, 0.0),
                TemperatureRecord::new(2015, 288.70, 0.0),
                TemperatureRecord::new(2016, 289.10, 0.0),
            ],
            2015,
        )
        .unwrap();
        let config = ChartConfig::default();
        let layout = ChartLayout::new(&ds, &config);
        (ds, layout, config)
    }

    #[test]
    fn document_has_gradient_line_and_legend() {
        let (ds, layout, config) = fixture();
        let svg = render(&ds, &layout, None, &config);
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r##"stop-color="#4facfe""##));
        assert!(svg.contains(r##"stop-color="#00f2fe""##));
        assert!(svg.contains(r#"d="M80.00,"#));
        assert!(svg.contains("Yearly Average"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn main_line_carries_drop_shadow() {
        let (ds, layout, config) = fixture();
        let svg = render(&ds, &layout, None, &config);
        assert!(svg.contains(
            r##"<feDropShadow dx="0" dy="2" stdDeviation="1.5" flood-color="#000000" flood-opacity="0.15"/>"##
        ));
        let line = svg
            .lines()
            .find(|l| l.contains(r#"stroke="url(#lineGradient)""#))
            .unwrap();
        assert!(line.contains(r#"filter="url(#lineShadow)""#));
        // Legend swatch is not shadowed.
        assert_eq!(svg.matches("url(#lineShadow)").count(), 1);
    }

    #[test]
    fn visible_view_adds_marker_tooltip_and_title() {
        let (ds, layout, config) = fixture();
        let view = ViewState::compute(&ds, &layout, 2016.0);
        let svg = render(&ds, &layout, Some(&view), &config);
        assert!(svg.contains("<circle cx=\"840.00\""));
        assert!(svg.contains("289.10 K"));
        assert!(svg.contains("<title>Global temperature in 2016 was 289.10 K (+0.40 K vs. 2015)</title>"));
    }

    #[test]
    fn hidden_view_keeps_title_but_drops_marker() {
        let (ds, layout, config) = fixture();
        let view = ViewState::compute(&ds, &layout, 2016.0).hidden();
        let svg = render(&ds, &layout, Some(&view), &config);
        assert!(svg.contains("<title>"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn path_data_empty_for_no_segments() {
        assert_eq!(path_data(&[]), "");
    }
}
