//! Asynchronous DEM fetching.
//!
//! Uses channel-based communication to bridge the background fetch with
//! egui's synchronous update loop.

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Outcome of a DEM fetch.
#[derive(Debug)]
pub enum DemLoadResult {
    Loaded { source: String, bytes: Vec<u8> },
    Error(String),
}

/// Channel that delivers raw DEM bytes back to the UI thread.
pub struct DemLoadChannel {
    sender: Sender<DemLoadResult>,
    receiver: Receiver<DemLoadResult>,
    in_flight: bool,
}

impl Default for DemLoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl DemLoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: false,
        }
    }

    /// Starts fetching `source`.
    ///
    /// On native `source` is a file path read on a background thread. On WASM
    /// it is a URL fetched with `spawn_local`. Either way the result goes
    /// through the channel and a repaint is requested.
    pub fn load(&mut self, ctx: egui::Context, source: String) {
        log::info!("Loading DEM from {}", source);
        self.in_flight = true;
        let sender = self.sender.clone();

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = match std::fs::read(&source) {
                    Ok(bytes) => DemLoadResult::Loaded { source, bytes },
                    Err(e) => DemLoadResult::Error(format!("{}: {}", source, e)),
                };
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = match fetch_bytes(&source).await {
                    Ok(bytes) => DemLoadResult::Loaded { source, bytes },
                    Err(e) => DemLoadResult::Error(format!("{}: {}", source, e)),
                };
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Non-blocking check for a finished fetch.
    pub fn try_recv(&mut self) -> Option<DemLoadResult> {
        let result = self.receiver.try_recv().ok();
        if result.is_some() {
            self.in_flight = false;
        }
        result
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| "No window object".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("fetch failed: {:?}", e))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| "fetch did not return a Response".to_string())?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| format!("failed to read body: {:?}", e))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| format!("failed to read body: {:?}", e))?;

    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
