//! Central canvas UI: map view with the terrain overlay.

use super::colors;
use crate::app::SharedLayer;
use crate::geo::{BoundingBox, MapCamera};
use crate::state::AppState;
use crate::terrain::ElevationSampler;
use eframe::egui::{self, Align2, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use geo_types::Coord;
use std::sync::Arc;

/// Zoom levels per scroll pixel.
const SCROLL_ZOOM_RATE: f64 = 0.002;

pub fn render_canvas(
    ctx: &egui::Context,
    state: &mut AppState,
    layer: &SharedLayer,
    bounds: &BoundingBox,
    sampler: &ElevationSampler,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available_size = ui.available_size();

            // Allocate the full available space for the canvas
            let (response, painter) =
                ui.allocate_painter(available_size, Sense::click_and_drag());

            let rect = response.rect;

            // Draw background
            painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

            let view = &state.view_state;
            let mut camera = MapCamera::new(view.center_lat, view.center_lon, view.zoom);
            camera.update(view.zoom, view.pan_offset, rect);

            draw_graticule(&painter, &camera);

            // Overlay draws straight into the framebuffer under egui's clip rect
            let matrix = camera.view_projection();
            let opacity = state.overlay_state.opacity();
            let layer = layer.clone();
            painter.add(egui::PaintCallback {
                rect,
                callback: Arc::new(egui_glow::CallbackFn::new(move |_info, painter| {
                    layer.with(|layer| layer.render(painter.gl(), &matrix, opacity));
                })),
            });

            draw_bounds(&painter, &camera, bounds);
            draw_readout(&painter, &rect, &camera, &response, sampler);

            handle_canvas_interaction(&response, &rect, state);
        });
}

/// Outline of the area covered by the overlay.
fn draw_bounds(painter: &Painter, camera: &MapCamera, bounds: &BoundingBox) {
    let (min, max) = (bounds.min(), bounds.max());
    let corners = [
        Coord { x: min.x, y: min.y },
        Coord { x: max.x, y: min.y },
        Coord { x: max.x, y: max.y },
        Coord { x: min.x, y: max.y },
    ];
    let points: Vec<Pos2> = corners.iter().map(|c| camera.geo_to_screen(*c)).collect();
    painter.add(Shape::closed_line(
        points,
        Stroke::new(1.5, colors::canvas::BOUNDS),
    ));
}

/// Lines every 0.05 degrees, skipped when they would be too dense.
fn draw_graticule(painter: &Painter, camera: &MapCamera) {
    const STEP: f64 = 0.05;
    let (min_lon, min_lat, max_lon, max_lat) = camera.visible_bounds();
    if (max_lon - min_lon) / STEP > 80.0 {
        return;
    }

    let stroke = Stroke::new(1.0, colors::canvas::graticule());
    let rect = camera.screen_rect;

    let mut lon = (min_lon / STEP).floor() * STEP;
    while lon <= max_lon {
        let x = camera.geo_to_screen(Coord { x: lon, y: min_lat }).x;
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        lon += STEP;
    }

    let mut lat = (min_lat / STEP).floor() * STEP;
    while lat <= max_lat {
        let y = camera.geo_to_screen(Coord { x: min_lon, y: lat }).y;
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        lat += STEP;
    }
}

/// Zoom level and the coordinate / elevation under the cursor.
fn draw_readout(
    painter: &Painter,
    rect: &Rect,
    camera: &MapCamera,
    response: &egui::Response,
    sampler: &ElevationSampler,
) {
    let origin = rect.left_bottom() + Vec2::new(10.0, -10.0);
    let mut text = format!("z{:.1}", camera.zoom);

    if let Some(pos) = response.hover_pos() {
        let coord = camera.screen_to_geo(pos);
        text.push_str(&format!("  {:.4}, {:.4}", coord.y, coord.x));
        if let Ok(elevation) = sampler.try_elevation_bilinear(coord.x, coord.y) {
            text.push_str(&format!("  {:.0} m", elevation));
        }
    }

    painter.text(
        origin,
        Align2::LEFT_BOTTOM,
        text,
        FontId::monospace(12.0),
        colors::canvas::READOUT,
    );
}

fn handle_canvas_interaction(response: &egui::Response, rect: &Rect, state: &mut AppState) {
    // Handle dragging for panning
    if response.dragged() {
        state.view_state.pan_offset += response.drag_delta();
    }

    // Handle scroll for zooming relative to cursor position
    if response.hovered() {
        let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
        if scroll_delta.y != 0.0 {
            let cursor_rel = response
                .hover_pos()
                .map(|pos| pos - rect.center())
                .unwrap_or(Vec2::ZERO);
            state
                .view_state
                .zoom_about(scroll_delta.y as f64 * SCROLL_ZOOM_RATE, cursor_rel);
        }
    }

    // Reset view on double-click
    if response.double_clicked() {
        state.view_state.reset();
    }
}
