//! Application shell: owns the DEM, the overlay layer and the UI state.

use crate::config::OverlayConfig;
use crate::geo::{BoundingBox, WebMercator};
use crate::overlay::{OverlayKind, OverlayLayer};
use crate::state::{AppState, DemStatus};
use crate::terrain::{DemLoadChannel, DemLoadResult, ElevationSampler};
use crate::ui;
use eframe::egui;
use std::sync::{Arc, Mutex};

/// Overlay layer shared between the update loop and the paint callback.
#[derive(Clone)]
pub struct SharedLayer(Arc<Mutex<OverlayLayer<glow::Context>>>);

// SAFETY: wasm32 is single-threaded. The web GL handles are JS objects that
// never leave the main thread, so the paint callback bounds are vacuous there.
#[cfg(target_arch = "wasm32")]
unsafe impl Send for SharedLayer {}
#[cfg(target_arch = "wasm32")]
unsafe impl Sync for SharedLayer {}

impl SharedLayer {
    pub fn new(layer: OverlayLayer<glow::Context>) -> Self {
        Self(Arc::new(Mutex::new(layer)))
    }

    /// Runs `f` with the layer locked. Returns `None` if the lock is poisoned.
    pub fn with<R>(&self, f: impl FnOnce(&mut OverlayLayer<glow::Context>) -> R) -> Option<R> {
        match self.0.lock() {
            Ok(mut layer) => Some(f(&mut layer)),
            Err(_) => {
                log::error!("Overlay layer lock poisoned");
                None
            }
        }
    }
}

/// Overlay pieces that only exist when the configured extent is valid.
struct Overlay {
    layer: SharedLayer,
    bounds: BoundingBox,
}

/// Main application state and logic.
pub struct AlmanacApp {
    config: OverlayConfig,

    /// Application state containing all sub-states
    state: AppState,

    /// Elevation lookups over the loaded DEM
    sampler: ElevationSampler,

    /// Channel for the async DEM fetch
    dem_channel: DemLoadChannel,

    overlay: Option<Overlay>,

    /// Kind the layer was last told about
    applied_kind: OverlayKind,
}

impl AlmanacApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = OverlayConfig::load();
        let mut state = AppState::new(&config);

        let overlay = match (config.mesh_builder(), config.bounding_box()) {
            (Ok(builder), Ok(bounds)) => Some(Overlay {
                layer: SharedLayer::new(OverlayLayer::new(builder, config.initial_kind)),
                bounds,
            }),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("Invalid overlay configuration: {}", e);
                state.status_message = format!("Overlay disabled: {}", e);
                None
            }
        };

        if cc.gl.is_none() {
            log::warn!("No glow context available, overlay will not render");
        }

        let mut dem_channel = DemLoadChannel::new();
        dem_channel.load(cc.egui_ctx.clone(), config.dem_source.clone());
        state.dem_status = DemStatus::Loading;

        let applied_kind = state.overlay_state.kind();

        Self {
            config,
            state,
            sampler: ElevationSampler::new(),
            dem_channel,
            overlay,
            applied_kind,
        }
    }

    /// Handles a finished DEM fetch. Returns true when the sampler changed.
    fn handle_dem_result(&mut self, result: DemLoadResult) -> bool {
        match result {
            DemLoadResult::Loaded { source, bytes } => match self.sampler.initialize(&bytes) {
                Ok(()) => {
                    let (width, height) = self.sampler.dimensions().unwrap_or_default();
                    log::info!("DEM {} ready ({}x{})", source, width, height);
                    self.state.dem_status = DemStatus::Ready { width, height };
                    true
                }
                Err(e) => {
                    log::error!("Failed to decode DEM {}: {}", source, e);
                    self.state.dem_status = DemStatus::Failed(e.to_string());
                    false
                }
            },
            DemLoadResult::Error(e) => {
                log::error!("Failed to load DEM from {}: {}", self.config.dem_source, e);
                self.state.dem_status = DemStatus::Failed(e);
                false
            }
        }
    }

    /// Pushes DEM and kind changes into the layer.
    fn sync_overlay(&mut self, gl: &glow::Context, dem_changed: bool) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        let kind = self.state.overlay_state.kind();
        let sampler = &self.sampler;
        let started = web_time::Instant::now();

        let built = overlay.layer.with(|layer| {
            if !layer.is_attached() {
                layer.on_add(gl, sampler, &WebMercator);
                layer.set_kind(gl, kind, sampler, &WebMercator);
                true
            } else if kind != layer.kind() {
                layer.set_kind(gl, kind, sampler, &WebMercator);
                true
            } else if dem_changed {
                layer.rebuild(gl, sampler, &WebMercator);
                true
            } else {
                false
            }
        });

        if built == Some(true) {
            self.applied_kind = kind;
            let status = overlay
                .layer
                .with(|layer| layer.status().map(|s| s.label()))
                .flatten()
                .unwrap_or("Unbuilt");
            log::debug!(
                "Overlay {} built in {:.1} ms",
                kind.label(),
                started.elapsed().as_secs_f64() * 1000.0
            );
            self.state.status_message = format!("{} overlay: {}", kind.label(), status);
        }
    }
}

impl eframe::App for AlmanacApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let mut dem_changed = false;
        if let Some(result) = self.dem_channel.try_recv() {
            dem_changed = self.handle_dem_result(result);
        }

        if let Some(gl) = frame.gl().cloned() {
            let kind_changed = self.state.overlay_state.kind() != self.applied_kind;
            let needs_attach = self
                .overlay
                .as_ref()
                .and_then(|o| o.layer.with(|layer| !layer.is_attached()))
                .unwrap_or(false);
            if dem_changed || kind_changed || needs_attach {
                self.sync_overlay(&gl, dem_changed);
            }
        }

        ui::render_top_bar(ctx, &self.state);
        ui::render_sidebar(ctx, &mut self.state);
        ui::render_legend(ctx, self.state.overlay_state.kind());

        if let Some(overlay) = &self.overlay {
            ui::render_canvas(
                ctx,
                &mut self.state,
                &overlay.layer,
                &overlay.bounds,
                &self.sampler,
            );
        } else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(&self.state.status_message);
                });
            });
        }

        if self.dem_channel.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let (Some(gl), Some(overlay)) = (gl, &self.overlay) {
            overlay.layer.with(|layer| layer.on_remove(gl));
        }
    }
}
