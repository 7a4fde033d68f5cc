//! Top bar UI: app title, DEM status and overlay status.

use super::colors;
use crate::state::{AppState, DemStatus};
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("Backcountry Almanac")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                let dem_color = match state.dem_status {
                    DemStatus::NotLoaded => colors::ui::LABEL,
                    DemStatus::Loading => colors::ui::PENDING,
                    DemStatus::Ready { .. } => colors::ui::SUCCESS,
                    DemStatus::Failed(_) => colors::ui::ERROR,
                };
                if state.dem_status == DemStatus::Loading {
                    ui.spinner();
                }
                ui.label(
                    RichText::new(state.dem_status.label())
                        .size(13.0)
                        .color(dem_color),
                );

                ui.separator();

                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(colors::ui::VALUE),
                );
            });
        });
}
