//! Legend for the active overlay, pinned to the top-right of the map.

use super::colors;
use crate::overlay::OverlayKind;
use eframe::egui::{self, RichText};

pub fn render_legend(ctx: &egui::Context, kind: OverlayKind) {
    egui::Area::new(egui::Id::new("legend"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 48.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(280.0);
                ui.label(kind.description());

                let entries = kind.legend();
                if entries.is_empty() {
                    return;
                }

                ui.add_space(4.0);
                ui.horizontal_wrapped(|ui| {
                    for entry in entries {
                        ui.label(
                            RichText::new(entry.label)
                                .strong()
                                .color(colors::legend_swatch(entry.color)),
                        );
                    }
                });
            });
        });
}
