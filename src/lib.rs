#![warn(clippy::all)]

//! Backcountry Almanac - terrain overlays for backcountry trip planning.
//!
//! A DEM (GeoTIFF) is sampled on a regular grid and drawn over an
//! interactive map as an elevation, slope or aspect color overlay.

pub mod app;
pub mod config;
pub mod error;
pub mod geo;
pub mod overlay;
pub mod state;
pub mod terrain;
mod ui;

pub use app::AlmanacApp;
