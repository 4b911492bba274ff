use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use lis_curves::color::{legend_entries, ColorPolicy};
use lis_curves::data::filter::Direction;
use lis_curves::render::CurveSelection;

use super::to_color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – curve controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Curves");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Which curve sets ----
            ui.strong("Show");
            let mut selection = state.session.config().selection;
            for option in CurveSelection::ALL {
                ui.radio_value(&mut selection, option, option.to_string());
            }
            if selection != state.session.config().selection {
                state.set_selection(selection);
            }
            ui.separator();

            // ---- Colour policy ----
            ui.strong("Color by");
            let mut policy = state.session.config().color_policy;
            for option in ColorPolicy::ALL {
                ui.radio_value(&mut policy, option, option.label());
            }
            if policy != state.session.config().color_policy {
                state.set_color_policy(policy);
            }
            ui.separator();

            // ---- Loading / cleaning ----
            egui::CollapsingHeader::new(RichText::new("Loading").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("Sheet");
                        ui.add(
                            egui::TextEdit::singleline(&mut state.sheet_input)
                                .hint_text("first sheet"),
                        );
                    });
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("CC starts at step");
                        ui.add(egui::DragValue::new(&mut state.cc_start_step).range(0..=10_000));
                    });
                    if ui.button("Apply").clicked() {
                        state.apply_cleaning();
                    }
                });
            ui.separator();

            // ---- Legend ----
            ui.strong("Legend");
            let Some(loaded) = state.session.loaded() else {
                ui.label("No file loaded.");
                return;
            };
            let policy = state.session.config().color_policy;
            let selection = state.session.config().selection;
            for direction in Direction::ALL {
                if !selection.includes(direction) {
                    continue;
                }
                let curves = loaded.curves.get(direction);
                if curves.is_empty() {
                    ui.label(RichText::new(format!("no {direction} curves")).italics());
                    continue;
                }
                for (label, color) in legend_entries(curves, policy) {
                    ui.label(RichText::new(format!("━━ {label}")).color(to_color32(color)));
                }
            }
        });
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
            let can_export = state.rendered.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export PNG…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state.current_file_name() {
            ui.label(name);
        }
        if let Some(loaded) = state.session.loaded() {
            ui.label(format!(
                "{} rows, {} curves shown",
                loaded.records.len(),
                loaded.chart.curves.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.separator();
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open battery cycling data")
        .add_filter("Supported files", &["xlsx", "xls", "xlsb", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xls", "xlsb"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name(state.session.config().export.file_name.as_str())
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
