use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::chart::{table_rows, write_chart_json, write_rows_csv};
use crate::color::ColorMap;
use crate::data::labels::metric_label;
use crate::state::{AppState, SelectionEvent};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left configuration panel.
///
/// Widgets only collect [`SelectionEvent`]s; they are applied once the panel
/// is drawn so every control sees the same state within a frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Configure the plot");
    ui.separator();

    let (Some(dataset), Some(selection)) = (&state.dataset, &state.selection) else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut events: Vec<SelectionEvent> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Continent ----
            ui.strong("Choose a continent");
            egui::ComboBox::from_id_salt("continent")
                .selected_text(selection.continent.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for continent in &dataset.continents {
                        if ui
                            .selectable_label(selection.continent == *continent, continent.as_str())
                            .clicked()
                            && selection.continent != *continent
                        {
                            events.push(SelectionEvent::Continent(continent.clone()));
                        }
                    }
                });
            ui.add_space(4.0);

            // ---- Metric: labels shown, raw keys stored ----
            ui.strong("Choose a metric");
            egui::ComboBox::from_id_salt("metric")
                .selected_text(display_metric(&selection.metric))
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in &dataset.metrics {
                        let label = display_metric(metric);
                        if ui
                            .selectable_label(selection.metric == *metric, label)
                            .clicked()
                            && selection.metric != *metric
                        {
                            events.push(SelectionEvent::Metric(metric.clone()));
                        }
                    }
                });
            ui.add_space(4.0);

            let mut show_data = state.show_data;
            if ui
                .checkbox(&mut show_data, "Show the data used to generate this plot")
                .changed()
            {
                events.push(SelectionEvent::ShowData(show_data));
            }
            ui.separator();

            // ---- Year range ----
            ui.strong("What years should be plotted?");
            match state.view.year_bounds {
                Some(bounds) => {
                    let (mut lo, mut hi) = selection.year_range;
                    let lo_changed = ui
                        .add(Slider::new(&mut lo, bounds.min..=hi).text("from"))
                        .changed();
                    let hi_changed = ui
                        .add(Slider::new(&mut hi, lo..=bounds.max).text("to"))
                        .changed();
                    if lo_changed || hi_changed {
                        events.push(SelectionEvent::YearRange(lo, hi));
                    }
                }
                None => {
                    ui.label("No years available for this selection.");
                }
            }
            ui.separator();

            // ---- Countries ----
            let options = &state.view.country_options;
            let header_text = format!(
                "Which countries should be plotted?  ({}/{})",
                selection.countries.len(),
                options.len()
            );
            let color_map = ColorMap::new(options);

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            events.push(SelectionEvent::AllCountries);
                        }
                        if ui.small_button("None").clicked() {
                            events.push(SelectionEvent::NoCountries);
                        }
                    });

                    for country in options {
                        let mut checked = selection.countries.contains(country);
                        let text = RichText::new(country).color(color_map.color_for(country));
                        if ui.checkbox(&mut checked, text).changed() {
                            events.push(SelectionEvent::ToggleCountry(country.clone()));
                        }
                    }
                });
        });

    for event in events {
        state.handle(event);
    }
}

/// Label for a metric key; the raw key if it has none.
fn display_metric(metric: &str) -> &str {
    match metric_label(metric) {
        Ok(label) => label,
        Err(_) => metric,
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_chart = state.chart.is_some();
            if ui
                .add_enabled(has_chart, egui::Button::new("Export chart spec…"))
                .clicked()
            {
                save_file_dialog(state, Export::Chart);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_chart, egui::Button::new("Export filtered data…"))
                .clicked()
            {
                save_file_dialog(state, Export::Rows);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(state.status_line());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Gapminder data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset, Some(path)),
            Err(e) => {
                // The dashboard keeps showing the previous dataset.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Export {
    Chart,
    Rows,
}

fn save_file_dialog(state: &mut AppState, kind: Export) {
    let (title, file_name, filter) = match kind {
        Export::Chart => ("Export chart spec", "chart.json", "json"),
        Export::Rows => ("Export filtered data", "filtered.csv", "csv"),
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(file_name)
        .add_filter(filter, &[filter])
        .save_file()
    else {
        return;
    };

    match export(state, kind, &path) {
        Ok(()) => {
            log::info!("Exported to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn export(state: &AppState, kind: Export, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    match kind {
        Export::Chart => {
            let chart = state.chart.as_ref().context("no chart to export")?;
            write_chart_json(chart, writer)
        }
        Export::Rows => {
            let dataset = state.dataset.as_ref().context("no dataset loaded")?;
            write_rows_csv(&table_rows(dataset, &state.view.visible), writer)
        }
    }
}
