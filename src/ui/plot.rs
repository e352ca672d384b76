use eframe::egui::{RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Line chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart title, the line chart and the summary sentence.
pub fn line_chart(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(state.summary.as_str());
        });
        return;
    };

    ui.heading(chart.title.as_str());
    ui.label(RichText::new(&state.summary).italics());
    if chart.is_empty() {
        ui.label("Nothing to plot for the current selection.");
    }
    ui.add_space(4.0);

    Plot::new("line_chart")
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                let line = Line::new(points)
                    .name(&series.country)
                    .color(series.color)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}
