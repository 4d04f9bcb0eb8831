use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SolarDashboardApp {
    pub state: AppState,
}

impl SolarDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SolarDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Filters may have changed above; recompute before drawing results.
        self.state.refresh_if_needed();

        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Central panel: charts and summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No observations to display.");
        });
        return;
    };

    if snapshot.view.is_empty() {
        ui.label("No observations match the current filters. Widen the date range or select a country.");
        ui.separator();
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                plot::distribution_plot(&mut cols[0], state, snapshot);
                plot::trend_plot(&mut cols[1], state, snapshot);
            });
            ui.separator();
            ui.columns(2, |cols| {
                plot::scatter_plot(&mut cols[0], state, snapshot);
                plot::ranking_plot(&mut cols[1], state, snapshot);
            });
            ui.separator();
            panels::summary_table(ui, state);
        });
}
