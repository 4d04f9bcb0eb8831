use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use solar_dashboard::DashboardSnapshot;

use crate::state::AppState;

const PLOT_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Axis formatter that labels integer positions with category names.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn empty_state(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label("No data for the current selection.");
    });
}

// ---------------------------------------------------------------------------
// Box plot: distribution per country
// ---------------------------------------------------------------------------

pub fn distribution_plot(ui: &mut Ui, state: &AppState, snapshot: &DashboardSnapshot) {
    let metric = snapshot.view.metric;
    ui.heading(format!("{metric} Comparison by Country"));
    if snapshot.distribution.is_empty() {
        empty_state(ui);
        return;
    }

    let labels: Vec<String> = snapshot
        .distribution
        .keys()
        .map(|c| c.label().to_string())
        .collect();

    Plot::new("distribution_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Country")
        .y_axis_label(metric.column())
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for (pos, (country, stats)) in snapshot.distribution.iter().enumerate() {
                let spread = BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                );
                let elem = BoxElem::new(pos as f64, spread)
                    .name(country.label())
                    .box_width(0.5)
                    .whisker_width(0.3);
                plot_ui.box_plot(
                    BoxPlot::new(vec![elem])
                        .name(country.label())
                        .color(state.color_map.color_for(*country)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line plot: daily mean trend
// ---------------------------------------------------------------------------

pub fn trend_plot(ui: &mut Ui, state: &AppState, snapshot: &DashboardSnapshot) {
    let metric = snapshot.view.metric;
    ui.heading(format!("{metric} Trend Over Time"));
    if snapshot.view.is_empty() {
        empty_state(ui);
        return;
    }

    Plot::new("trend_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label(metric.column())
        .x_axis_formatter(x_to_date_label)
        .show(ui, |plot_ui| {
            for (country, series) in &snapshot.trends {
                let color = state.color_map.color_for(*country);
                let make_line = |points: Vec<[f64; 2]>| {
                    Line::new(PlotPoints::from(points))
                        .name(country.label())
                        .color(color)
                        .width(1.5)
                };
                // Break the line where days are missing.
                let mut segment: Vec<[f64; 2]> = Vec::new();
                let mut last_x: Option<f64> = None;
                for point in series {
                    let x = date_to_x(point.date);
                    if last_x.is_some_and(|prev| x - prev > 1.0) {
                        plot_ui.line(make_line(std::mem::take(&mut segment)));
                    }
                    segment.push([x, point.mean]);
                    last_x = Some(x);
                }
                if !segment.is_empty() {
                    plot_ui.line(make_line(segment));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plot: RH vs metric on the bounded sample
// ---------------------------------------------------------------------------

pub fn scatter_plot(ui: &mut Ui, state: &AppState, snapshot: &DashboardSnapshot) {
    let metric = snapshot.view.metric;
    ui.heading(format!("RH vs. {metric}"));
    if snapshot.sample.is_empty() {
        empty_state(ui);
        return;
    }

    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Relative Humidity (%)")
        .y_axis_label(metric.column())
        .show(ui, |plot_ui| {
            for country in snapshot.sample.countries() {
                let points: PlotPoints = snapshot
                    .sample
                    .rows
                    .iter()
                    .filter(|r| r.country == country)
                    .map(|r| [r.rh, r.value])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(country.label())
                        .color(state.color_map.color_for(country).gamma_multiply(0.6))
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart: ranking by mean
// ---------------------------------------------------------------------------

pub fn ranking_plot(ui: &mut Ui, state: &AppState, snapshot: &DashboardSnapshot) {
    let metric = snapshot.view.metric;
    ui.heading(format!("Average {metric} by Country"));
    if snapshot.ranking.is_empty() {
        empty_state(ui);
        return;
    }

    let labels: Vec<String> = snapshot
        .ranking
        .iter()
        .map(|(c, _)| c.label().to_string())
        .collect();
    let bars: Vec<Bar> = snapshot
        .ranking
        .iter()
        .enumerate()
        .map(|(pos, (country, mean))| {
            Bar::new(pos as f64, *mean)
                .name(country.label())
                .fill(state.color_map.color_for(*country))
                .width(0.6)
        })
        .collect();

    Plot::new("ranking_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label("Country")
        .y_axis_label(format!("Mean {metric} (W/m²)"))
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(format!("Mean {metric}")));
        });
}
