use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, Vec2, pos2, vec2,
};

use crate::chart::curve::flatten;
use crate::chart::layout::ChartLayout;
use crate::color::{self, Gradient};
use crate::config::ChartConfig;
use crate::data::model::TemperatureDataset;
use crate::state::AppState;
use crate::view::ViewState;

/// Samples per cubic segment when flattening the line for the painter.
const CURVE_STEPS: usize = 16;

// ---------------------------------------------------------------------------
// Temperature chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart canvas and feed pointer enter/leave back into `state`.
pub fn temperature_chart(ui: &mut Ui, state: &mut AppState) {
    let now = ui.ctx().input(|i| i.time);

    let (Some(dataset), Some(layout)) = (&state.dataset, &state.layout) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view temperatures  (File → Open…)");
        });
        return;
    };

    let (rect, response) = ui.allocate_exact_size(
        vec2(layout.width, layout.height),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    let origin = rect.min.to_vec2();

    painter.rect_filled(rect, 4.0, Color32::WHITE);
    draw_grid(&painter, layout, origin);
    draw_line(&painter, dataset, layout, &state.config, origin);
    draw_legend(&painter, layout, &state.config, origin);
    draw_axes(&painter, layout, origin);

    if let (Some(view), Some(marker)) = (&state.view, state.marker_position(now)) {
        draw_marker(&painter, marker + origin, state.config.marker_radius);
        draw_tooltip(&painter, layout, view, &state.config, marker, origin);
    }

    let hovered = response.hovered();
    state.pointer_over_chart(hovered);

    if state.is_animating(now) {
        ui.ctx().request_repaint();
    }
}

fn grid_stroke() -> Stroke {
    Stroke::new(1.0, color::to_color32_alpha(color::GRID, color::GRID_OPACITY))
}

fn draw_grid(painter: &Painter, layout: &ChartLayout, origin: Vec2) {
    let plot = layout.plot_rect();
    for (x, _) in layout.x_ticks() {
        painter.line_segment(
            [pos2(x, plot.top()) + origin, pos2(x, plot.bottom()) + origin],
            grid_stroke(),
        );
    }
    for (y, _) in layout.y_ticks() {
        painter.line_segment(
            [pos2(plot.left(), y) + origin, pos2(plot.right(), y) + origin],
            grid_stroke(),
        );
    }
}

fn draw_line(
    painter: &Painter,
    dataset: &TemperatureDataset,
    layout: &ChartLayout,
    config: &ChartConfig,
    origin: Vec2,
) {
    let plot = layout.plot_rect();
    let gradient = Gradient::new(config.gradient_start, config.gradient_end);
    let points = flatten(&layout.line_segments(dataset), CURVE_STEPS);

    // One path for the shadow so overlapping joints don't darken.
    painter.add(Shape::line(
        shadow_points(&points, origin),
        Stroke::new(
            3.0 + color::SHADOW_BLUR,
            color::to_color32_alpha(color::SHADOW, color::SHADOW_OPACITY),
        ),
    ));

    // egui strokes are single-coloured, so each short piece takes the
    // gradient colour at its midpoint.
    for pair in points.windows(2) {
        let mid_x = (pair[0].x + pair[1].x) * 0.5;
        let t = if plot.width() > 0.0 {
            (mid_x - plot.left()) / plot.width()
        } else {
            0.0
        };
        painter.line_segment(
            [pair[0] + origin, pair[1] + origin],
            Stroke::new(3.0, gradient.color32_at(t)),
        );
    }
}

fn draw_legend(painter: &Painter, layout: &ChartLayout, config: &ChartConfig, origin: Vec2) {
    let gradient = Gradient::new(config.gradient_start, config.gradient_end);
    let top_left = layout.legend_origin() + origin;

    let swatch_width = 15;
    for i in 0..swatch_width {
        let t = i as f32 / (swatch_width - 1) as f32;
        let x = top_left.x + i as f32;
        painter.rect_filled(
            Rect::from_min_size(pos2(x, top_left.y - 10.0), vec2(1.0, 3.0)),
            0.0,
            gradient.color32_at(t),
        );
    }
    painter.text(
        pos2(top_left.x + 25.0, top_left.y - 8.5),
        Align2::LEFT_CENTER,
        &config.legend_label,
        FontId::proportional(14.0),
        color::to_color32(color::TEXT),
    );
}

fn draw_axes(painter: &Painter, layout: &ChartLayout, origin: Vec2) {
    let plot = layout.plot_rect();
    let ink = color::to_color32(color::TEXT);
    let stroke = Stroke::new(1.0, ink);
    let font = FontId::proportional(13.0);

    painter.line_segment(
        [plot.left_bottom() + origin, plot.right_bottom() + origin],
        stroke,
    );
    for (x, label) in layout.x_ticks() {
        let base = pos2(x, plot.bottom()) + origin;
        painter.line_segment([base, base + vec2(0.0, 6.0)], stroke);
        painter.text(base + vec2(0.0, 9.0), Align2::CENTER_TOP, label, font.clone(), ink);
    }

    painter.line_segment(
        [plot.left_top() + origin, plot.left_bottom() + origin],
        stroke,
    );
    for (y, label) in layout.y_ticks() {
        let base = pos2(plot.left(), y) + origin;
        painter.line_segment([base - vec2(6.0, 0.0), base], stroke);
        painter.text(base - vec2(9.0, 0.0), Align2::RIGHT_CENTER, label, font.clone(), ink);
    }
}

fn draw_marker(painter: &Painter, center: Pos2, radius: f32) {
    painter.circle(
        center,
        radius,
        color::to_color32(color::MARKER_FILL),
        Stroke::new(2.0, Color32::WHITE),
    );
}

/// Year on top, temperature below, in a white box offset from the marker.
fn draw_tooltip(
    painter: &Painter,
    layout: &ChartLayout,
    view: &ViewState,
    config: &ChartConfig,
    marker: Pos2,
    origin: Vec2,
) {
    let ink = color::to_color32(color::TEXT);
    let title = painter.layout_no_wrap(view.tooltip.title.clone(), FontId::proportional(15.0), ink);
    let body = painter.layout_no_wrap(view.tooltip.body.clone(), FontId::proportional(13.0), ink);

    let pad = 8.0;
    let size = vec2(
        title.size().x.max(body.size().x) + 2.0 * pad,
        title.size().y + body.size().y + 2.0 * pad,
    );
    let anchor = layout.tooltip_anchor(marker, config.tooltip_offset, (size.x, size.y)) + origin;
    let frame = Rect::from_min_size(anchor, size);

    painter.rect_filled(frame.expand(1.0), 5.0, color::to_color32(color::GRID));
    painter.rect_filled(frame, 4.0, Color32::from_white_alpha(242));

    let title_height = title.size().y;
    painter.galley(anchor + vec2(pad, pad), title, ink);
    painter.galley(anchor + vec2(pad, pad + title_height), body, ink);
}

/// The line's points moved onto the canvas and down by the shadow offset.
fn shadow_points(points: &[Pos2], origin: Vec2) -> Vec<Pos2> {
    let offset = origin + vec2(0.0, color::SHADOW_OFFSET_Y);
    points.iter().map(|&p| p + offset).collect()
}
