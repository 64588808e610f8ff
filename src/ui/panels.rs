use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::columns::ColumnRole;
use crate::state::AppState;

const NONE_LABEL: &str = "(None)";

// ---------------------------------------------------------------------------
// Left side panel – column role selectors
// ---------------------------------------------------------------------------

/// Render the left panel: one selector per column role.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Detected columns");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No sounding loaded.");
        ui.add_space(8.0);
        usage_tips(ui);
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns = table.column_names();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for role in ColumnRole::ALL {
                ui.strong(role.label());
                let current = state.roles.get(role).map(str::to_string);
                let optional = role == ColumnRole::Altitude;
                let mut choice = current.clone();

                egui::ComboBox::from_id_salt(role.label())
                    .selected_text(current.as_deref().unwrap_or(NONE_LABEL))
                    .width(ui.available_width())
                    .show_ui(ui, |ui: &mut Ui| {
                        if optional {
                            ui.selectable_value(&mut choice, None, NONE_LABEL);
                        }
                        for col in &columns {
                            ui.selectable_value(&mut choice, Some(col.clone()), col.as_str());
                        }
                    });

                if choice != current {
                    log::debug!("Column role {role} set to {choice:?}");
                    state.set_role(role, choice);
                }
                ui.add_space(6.0);
            }

            ui.separator();
            usage_tips(ui);
        });
}

fn usage_tips(ui: &mut Ui) {
    ui.label(RichText::new("Tip").strong());
    ui.label("Columns are matched by name:");
    ui.label("• Temperature → contains \"temp\"");
    ui.label("• Dew Point → contains \"dew\"");
    ui.label("• Pressure → contains \"press\"");
    ui.label("• Altitude → contains \"alt\" or \"height\"");
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

        if state.loading {
            ui.spinner();
        }

        if let (Some(name), Some(table)) = (&state.source_name, &state.table) {
            ui.label(format!(
                "{name}: {} rows × {} columns",
                table.num_rows(),
                table.num_columns()
            ));
        }

        if let Some(analysis) = &state.analysis {
            ui.separator();
            ui.label(format!("{} usable levels", analysis.profile.len()));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sounding file")
        .add_filter(
            "Supported files",
            &["csv", "xlsx", "xls", "xlsm", "ods", "json", "parquet", "pq"],
        )
        .add_filter("CSV", &["csv"])
        .add_filter("Spreadsheet", &["xlsx", "xls", "xlsm", "ods"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    table.num_rows(),
                    table.column_names()
                );
                state.set_table(table, &path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
