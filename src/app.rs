use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ThermoScrubApp {
    pub state: AppState,
}

impl ThermoScrubApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ThermoScrubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: slider and status ----
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            panels::controls(ui, &mut self.state);
        });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                chart::temperature_chart(ui, &mut self.state);
            });
        });
    }
}
