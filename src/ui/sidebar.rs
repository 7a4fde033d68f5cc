//! Sidebar UI: base map and overlay settings.

use crate::overlay::OverlayKind;
use crate::state::AppState;
use eframe::egui::{self, RichText, ScrollArea};

pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("sidebar")
        .resizable(true)
        .default_width(240.0)
        .min_width(200.0)
        .max_width(360.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Backcountry Almanac").monospace().strong());
                ui.separator();

                render_base_map_section(ui);
                ui.add_space(5.0);

                render_overlay_section(ui, state);
            });
        });
}

fn render_base_map_section(ui: &mut egui::Ui) {
    egui::CollapsingHeader::new(RichText::new("Base Map").strong())
        .default_open(true)
        .show(ui, |ui| {
            // only one base map for now
            let _ = ui.radio(true, "Terrain");
            ui.add_enabled(
                false,
                egui::RadioButton::new(false, "Satellite (Coming soon!)"),
            );
        });
}

fn render_overlay_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Overlay").strong())
        .default_open(true)
        .show(ui, |ui| {
            let mut opacity = state.overlay_state.opacity();
            let slider = egui::Slider::new(&mut opacity, 0.0..=1.0)
                .step_by(0.01)
                .text("Opacity");
            if ui.add(slider).changed() {
                state.overlay_state.set_opacity(opacity);
            }

            ui.add_space(4.0);

            let current = state.overlay_state.kind();
            for kind in OverlayKind::all() {
                if ui.radio(current == *kind, kind.label()).clicked() {
                    state.overlay_state.set_kind(*kind);
                }
            }
        });
}
