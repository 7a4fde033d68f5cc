//! UI modules for the Backcountry Almanac application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, DEM status and overlay status
//! - Sidebar: Base map and overlay settings
//! - Central canvas: Map with the terrain overlay
//! - Legend: Color scale of the active overlay

mod canvas;
mod colors;
mod legend;
mod sidebar;
mod top_bar;

pub use canvas::render_canvas;
pub use legend::render_legend;
pub use sidebar::render_sidebar;
pub use top_bar::render_top_bar;
