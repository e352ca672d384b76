use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart::table_rows;
use crate::data::model::COLUMNS;
use crate::state::AppState;

/// Render the exact final render set with every column.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let rows = table_rows(dataset, &state.view.visible);

    ui.strong(format!("{} rows", rows.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(90.0), COLUMNS.len())
        .header(20.0, |mut header| {
            for name in COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let obs = rows[row.index()];
                for column in 0..COLUMNS.len() {
                    row.col(|ui| {
                        ui.label(obs.cell(column));
                    });
                }
            });
        });
}
