use std::path::{Path, PathBuf};

use eframe::egui::Pos2;

use crate::chart::layout::ChartLayout;
use crate::config::ChartConfig;
use crate::data::error::DataError;
use crate::data::loader;
use crate::data::model::TemperatureDataset;
use crate::view::{MarkerTransition, ViewState};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ChartConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<TemperatureDataset>,

    /// Where `dataset` came from, for the title bar.
    pub source_path: Option<PathBuf>,

    /// Scales for the current dataset and canvas size.
    pub layout: Option<ChartLayout>,

    /// Slider position. Always inside the dataset's year range.
    pub slider_year: i32,

    /// Result of the last update.
    pub view: Option<ViewState>,

    /// Marker movement towards `view.marker_target`.
    pub marker: Option<MarkerTransition>,

    /// Whether the pointer was over the chart on the previous frame.
    pub pointer_inside: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl AppState {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            dataset: None,
            source_path: None,
            layout: None,
            slider_year: 0,
            view: None,
            marker: None,
            pointer_inside: false,
            status_message: None,
        }
    }

    /// Load and validate a file, replacing the current dataset on success.
    /// On failure the previous dataset (if any) stays on screen.
    pub fn load_path(&mut self, path: &Path, now: f64) -> Result<(), DataError> {
        let dataset = loader::load_file(path, self.config.baseline_year)?;
        self.source_path = Some(path.to_path_buf());
        self.set_dataset(dataset, now);
        Ok(())
    }

    /// Ingest a newly loaded dataset and run the initial update with the
    /// slider at its starting value (the earliest year).
    pub fn set_dataset(&mut self, dataset: TemperatureDataset, now: f64) {
        let layout = ChartLayout::new(&dataset, &self.config);
        let (min_year, _) = dataset.year_range();

        self.layout = Some(layout);
        self.dataset = Some(dataset);
        self.slider_year = min_year;
        self.view = None;
        self.marker = None;
        self.status_message = None;

        self.update(f64::from(min_year), now);
    }

    /// Slider bounds, if a dataset is loaded.
    pub fn slider_range(&self) -> Option<(i32, i32)> {
        self.dataset.as_ref().map(TemperatureDataset::year_range)
    }

    /// Resolve `requested_year` and replace the view state wholesale.
    pub fn update(&mut self, requested_year: f64, now: f64) {
        let (Some(dataset), Some(layout)) = (&self.dataset, &self.layout) else {
            return;
        };

        let view = ViewState::compute(dataset, layout, requested_year);
        log::debug!(
            "requested {requested_year} -> {} ({:.2} K)",
            view.record.year,
            view.record.tas_k
        );

        let duration = self.config.transition.as_secs_f64();
        self.marker = Some(match &self.marker {
            Some(current) => current.retarget(view.marker_target, now, duration),
            None => MarkerTransition::settled(view.marker_target, now),
        });
        self.view = Some(view);
    }

    /// Slider moved to `year`.
    pub fn set_slider_year(&mut self, year: i32, now: f64) {
        let year = match self.slider_range() {
            Some((lo, hi)) => year.clamp(lo, hi),
            None => return,
        };
        self.slider_year = year;
        self.update(f64::from(year), now);
    }

    /// Track the pointer; leaving the chart hides marker and tooltip.
    pub fn pointer_over_chart(&mut self, inside: bool) {
        if self.pointer_inside && !inside {
            self.hide_marker();
        }
        self.pointer_inside = inside;
    }

    pub fn hide_marker(&mut self) {
        if let Some(view) = &self.view {
            self.view = Some(view.hidden());
        }
    }

    /// Marker position to draw this frame, if the marker is visible.
    pub fn marker_position(&self, now: f64) -> Option<Pos2> {
        let view = self.view.as_ref()?;
        if !view.marker_visible {
            return None;
        }
        Some(
            self.marker
                .map(|m| m.position_at(now))
                .unwrap_or(view.marker_target),
        )
    }

    /// True while the marker is still moving and frames should keep coming.
    pub fn is_animating(&self, now: f64) -> bool {
        self.marker.is_some_and(|m| !m.is_finished(now))
    }
}
