use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use housing_dash::data::{self, IncomeBand};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let (proximities, (lo, hi)) = match &state.dataset {
        Some(ds) => (ds.proximities().to_vec(), ds.price_bounds()),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Location type multi-select ----
            let n_selected = state.criteria.allowed_proximities.len();
            let header_text = format!("Choose Location Type  ({n_selected}/{})", proximities.len());

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("location_type")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });

                    for value in &proximities {
                        let mut checked = state.criteria.allowed_proximities.contains(value);
                        if ui.checkbox(&mut checked, value.label()).changed() {
                            state.toggle_proximity(value);
                        }
                    }
                });
            ui.separator();

            // ---- Income band ----
            ui.strong("Choose Income Level");
            let mut band = state.criteria.income_band;
            for choice in IncomeBand::ALL {
                ui.radio_value(&mut band, choice, choice.label());
            }
            state.set_income_band(band);
            ui.separator();

            // ---- Optional price range ----
            ui.strong("Median House Price");
            let mut changed = ui
                .checkbox(&mut state.price_limit, "Limit price range")
                .changed();
            ui.add_enabled_ui(state.price_limit, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("Min");
                    changed |= ui
                        .add(DragValue::new(&mut state.price_min).range(lo..=hi).speed(1000.0))
                        .changed();
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("Max");
                    changed |= ui
                        .add(DragValue::new(&mut state.price_max).range(lo..=hi).speed(1000.0))
                        .changed();
                });
            });
            if changed {
                state.refilter();
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
        });

        ui.separator();

        if let Some(summary) = state.visible_summary() {
            ui.label(summary);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open housing data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match data::load(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                // The previously loaded dataset, if any, stays in place.
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
