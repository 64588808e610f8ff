use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::plot;
use crate::analysis::indices::IndexKind;
use crate::analysis::pipeline::{Analysis, IndexReport};
use crate::chart;
use crate::color::likelihood_color;
use crate::data::table::RawTable;
use crate::state::AppState;

const PREVIEW_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the assessment, interpretation, plots and previews.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sounding file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(format!("Preview data (top {PREVIEW_ROWS} rows)"))
                .id_salt("raw_preview")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    table_preview(ui, "raw_table", table, PREVIEW_ROWS);
                });
            ui.separator();

            let Some(analysis) = &state.analysis else {
                if let Some(msg) = &state.status_message {
                    ui.label(RichText::new(msg).color(Color32::RED).size(16.0));
                }
                return;
            };

            match &analysis.indices {
                Ok(report) => {
                    summary_cards(ui, report);
                    ui.add_space(8.0);
                    interpretation(ui, report);
                }
                Err(e) => {
                    ui.label(RichText::new(format!("❌ {e}")).color(Color32::RED).size(16.0));
                }
            }
            ui.separator();

            plots(ui, state, analysis);

            ui.separator();
            egui::CollapsingHeader::new(format!("Cleaned profile ({} levels)", analysis.profile.len()))
                .id_salt("profile_preview")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    table_preview(ui, "profile_table", &analysis.profile.to_table(), usize::MAX);
                });
        });
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

fn summary_cards(ui: &mut Ui, report: &IndexReport) {
    ui.horizontal(|ui: &mut Ui| {
        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new("Overall Thunderstorm Assessment").strong());
                let overall = report.classification.overall;
                ui.label(
                    RichText::new(overall.headline())
                        .size(20.0)
                        .strong()
                        .color(likelihood_color(overall)),
                );
            });
        });

        for kind in IndexKind::ALL {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(kind.title());
                    ui.label(RichText::new(format!("{:.1}", report.values.get(kind))).size(22.0));
                    ui.label(RichText::new(report.classification.label(kind)).weak());
                });
            });
        }
    });
}

fn interpretation(ui: &mut Ui, report: &IndexReport) {
    let values = &report.values;
    let c = &report.classification;

    ui.heading("Interpretation");
    ui.label(format!("• K-Index ({:.1}) → {}", values.k, c.k.interpretation()));
    ui.label(format!("• Lifted Index ({:.1}) → {}", values.li, c.li.interpretation()));
    ui.label(format!("• Showalter Index ({:.1}) → {}", values.si, c.si.interpretation()));

    if ui.button("Copy report JSON").clicked() {
        match serde_json::to_string_pretty(report) {
            Ok(json) => ui.ctx().copy_text(json),
            Err(e) => log::error!("Failed to serialise report: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Plots
// ---------------------------------------------------------------------------

fn plots(ui: &mut Ui, state: &AppState, analysis: &Analysis) {
    ui.heading("Vertical Profiles & Indices");

    let profile_series = match analysis.report() {
        Some(report) => report.charts.profile.clone(),
        None => chart::profile_series(&analysis.profile),
    };

    ui.columns(2, |cols| {
        cols[0].strong("Temperature & Dew Point vs Pressure");
        plot::profile_plot(&mut cols[0], &profile_series, &state.series_colors);

        if let Some(report) = analysis.report() {
            cols[1].strong("Indices Summary");
            plot::index_chart(&mut cols[1], &report.charts.indices);
        }
    });

    let altitude = analysis
        .altitude
        .as_deref()
        .and_then(chart::altitude_series);
    if let Some(rows) = altitude {
        ui.add_space(8.0);
        ui.heading("Altitude vs Temperature");
        plot::altitude_plot(ui, &rows);
    }
}

// ---------------------------------------------------------------------------
// Table preview
// ---------------------------------------------------------------------------

fn table_preview(ui: &mut Ui, id: &str, table: &RawTable, max_rows: usize) {
    let n_cols = table.num_columns();
    let n_rows = table.num_rows().min(max_rows);

    TableBuilder::new(ui)
        .id_salt(id)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(70.0), n_cols)
        .header(20.0, |mut header| {
            for col in &table.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.name.as_str());
                });
            }
        })
        .body(|mut body| {
            for r in 0..n_rows {
                body.row(18.0, |mut row| {
                    for c in 0..n_cols {
                        row.col(|ui: &mut Ui| {
                            ui.label(table.cell(r, c).to_string());
                        });
                    }
                });
            }
        });
}
