use anyhow::Context;
use eframe::egui::{self, Color32, RichText, Ui};

use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                let now = ui.ctx().input(|i| i.time);
                open_file_dialog(state, now);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export SVG…"))
                .clicked()
            {
                export_svg_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let (lo, hi) = ds.year_range();
            let source = state
                .source_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!("{source}  {} years, {lo}–{hi}", ds.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – slider, year label, status sentence
// ---------------------------------------------------------------------------

/// Render the year scrubber and the status sentence under the chart.
pub fn controls(ui: &mut Ui, state: &mut AppState) {
    let Some((lo, hi)) = state.slider_range() else {
        return;
    };

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Year");
        let mut year = state.slider_year;
        let slider = egui::Slider::new(&mut year, lo..=hi)
            .step_by(1.0)
            .show_value(false);
        if ui.add(slider).changed() {
            let now = ui.ctx().input(|i| i.time);
            state.set_slider_year(year, now);
        }
        if let Some(view) = &state.view {
            ui.label(RichText::new(&view.year_label).strong().size(16.0));
        }
    });

    if let Some(view) = &state.view {
        let ink = color::to_color32(color::STATUS_TEXT);
        let status = &view.status;
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            let plain = |s: String| RichText::new(s).size(16.0).color(ink);
            ui.label(plain("Global temperature in ".into()));
            ui.label(plain(status.year.to_string()).strong());
            ui.label(plain(" was ".into()));
            ui.label(plain(status.temperature.clone()).strong());
            ui.label(plain(format!(
                " ({} vs. {})",
                status.difference, status.baseline_year
            )));
        });
    }
    ui.add_space(6.0);
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, now: f64) {
    let file = rfd::FileDialog::new()
        .set_title("Open temperature data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match state.load_path(&path, now) {
            Ok(()) => {
                if let Some(ds) = &state.dataset {
                    log::info!("Loaded {} records from {}", ds.len(), path.display());
                }
            }
            Err(e) => {
                let kind = if e.is_format_error() { "Malformed data" } else { "Error" };
                let e = anyhow::Error::new(e).context(format!("loading {}", path.display()));
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("{kind}: {e:#}"));
            }
        }
    }
}

pub fn export_svg_dialog(state: &mut AppState) {
    let (Some(dataset), Some(layout)) = (&state.dataset, &state.layout) else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export chart as SVG")
        .add_filter("SVG", &["svg"])
        .set_file_name("annual_temp.svg")
        .save_file()
    else {
        return;
    };

    let result = crate::svg::export(&path, dataset, layout, state.view.as_ref(), &state.config)
        .context("exporting SVG");
    match result {
        Ok(()) => {
            log::info!("Exported chart to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("{e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
