use eframe::egui::{self, Color32, Grid, RichText, Ui};
use egui_extras::DatePickerButton;

use solar_dashboard::Metric;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.date_bounds.is_none() {
        ui.label("No observations loaded.");
        return;
    }

    // ---- Date range ----
    ui.strong("Select Date Range");
    let mut start = state.start_date;
    let mut end = state.end_date;
    Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt("start_date"));
        ui.end_row();
        ui.label("To");
        ui.add(DatePickerButton::new(&mut end).id_salt("end_date"));
        ui.end_row();
    });
    state.set_dates(start, end);
    ui.separator();

    // ---- Countries ----
    ui.strong("Select Countries");
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });
    for country in state.dataset.countries() {
        let mut checked = state.selected_countries.contains(&country);
        let text = RichText::new(country.label()).color(state.color_map.color_for(country));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_country(country);
        }
    }
    ui.separator();

    // ---- Metric ----
    ui.strong("Select Metric");
    let current = state.metric;
    egui::ComboBox::from_id_salt("metric")
        .selected_text(current.column())
        .show_ui(ui, |ui: &mut Ui| {
            for metric in Metric::ALL {
                if ui
                    .selectable_label(current == metric, metric.column())
                    .clicked()
                {
                    state.set_metric(metric);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with row counts and the status message.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Solar Irradiance Dashboard");
        ui.separator();
        ui.label(format!(
            "{} observations loaded, {} visible",
            state.dataset.len(),
            state.visible_rows()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

/// Mean / median / standard deviation per country.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    ui.heading("Summary Statistics");
    if snapshot.summary.is_empty() {
        ui.label("No data for the current selection.");
        return;
    }

    Grid::new("summary_table")
        .striped(true)
        .num_columns(5)
        .spacing([24.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for header in ["Country", "Count", "Mean", "Median", "Std Dev"] {
                ui.strong(header);
            }
            ui.end_row();

            for (country, stats) in &snapshot.summary {
                ui.label(RichText::new(country.label()).color(state.color_map.color_for(*country)));
                ui.label(stats.count.to_string());
                ui.label(format_stat(stats.mean));
                ui.label(format_stat(stats.median));
                ui.label(format_stat(stats.std_dev));
                ui.end_row();
            }
        });
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}
