use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StormPandaApp {
    pub state: AppState,
}

impl eframe::App for StormPandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: column roles ----
        egui::SidePanel::left("column_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: assessment, interpretation, plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            report::central_panel(ui, &self.state);
        });
    }
}
