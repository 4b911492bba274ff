use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Show the first rows of the loaded table, before any cleaning.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    let Some(loaded) = state.session.loaded() else {
        ui.label("No data loaded.");
        return;
    };
    let records = &loaded.records;
    let rows = records.head(state.session.config().preview_rows);

    ui.strong(format!("Preview ({} of {} rows)", rows.len(), records.len()));

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(60.0), records.columns().len())
            .header(20.0, |mut header| {
                for name in records.columns() {
                    header.col(|ui| {
                        ui.label(RichText::new(name).strong());
                    });
                }
            })
            .body(|mut body| {
                for record in rows.records() {
                    body.row(18.0, |mut row| {
                        for cell in &record.cells {
                            row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}
