use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

/// Page heading and native window title.
pub const APP_TITLE: &str = "Interact with Gapminder Data";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Lay out every panel for one frame.
    pub fn show(&mut self, ctx: &egui::Context) {
        // ---- Top panel: title and menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: plot configuration ----
        egui::SidePanel::left("config_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: raw data (optional) ----
        if self.state.show_data {
            egui::TopBottomPanel::bottom("data_panel")
                .resizable(true)
                .default_height(260.0)
                .show(ctx, |ui| {
                    table::data_table(ui, &self.state);
                });
        }

        // ---- Central panel: page title, chart and summary ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(egui::RichText::new(APP_TITLE).size(24.0).strong());
            ui.separator();
            plot::line_chart(ui, &self.state);
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::state::SelectionEvent;

    fn run_frame(app: &mut DashboardApp) -> egui::FullOutput {
        let ctx = egui::Context::default();
        ctx.run(egui::RawInput::default(), |ctx| app.show(ctx))
    }

    #[test]
    fn test_frame_renders_with_data_table() {
        let mut state = AppState::new(true);
        state.set_dataset(sample_dataset(), None);
        let mut app = DashboardApp::new(state);
        let output = run_frame(&mut app);
        assert!(!output.shapes.is_empty());
    }

    #[test]
    fn test_frame_renders_empty_states() {
        let mut state = AppState::new(true);
        state.set_dataset(sample_dataset(), None);
        state.handle(SelectionEvent::NoCountries);
        let mut app = DashboardApp::new(state);
        run_frame(&mut app);

        app.state.handle(SelectionEvent::Continent("Africa".to_string()));
        app.state.handle(SelectionEvent::Metric("pop".to_string()));
        run_frame(&mut app);

        let mut empty = DashboardApp::new(AppState::default());
        assert!(!run_frame(&mut empty).shapes.is_empty());
    }

    #[test]
    fn test_page_title() {
        assert_eq!(APP_TITLE, "Interact with Gapminder Data");
    }
}
