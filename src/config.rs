//! Overlay configuration.
//!
//! Natively the configuration is read from the JSON file named by the
//! `ALMANAC_CONFIG` environment variable; in the browser it is read from
//! localStorage. Missing or malformed configuration falls back to the
//! Lassen Volcanic National Park defaults.

use crate::error::TerrainError;
use crate::geo::{BoundingBox, GridSpacing};
use crate::overlay::{OverlayKind, OverlayMeshBuilder};
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// DEM file path (native) or URL (web).
    pub dem_source: String,
    /// Overlay extent as `[min_lng, min_lat, max_lng, max_lat]`.
    pub bounds: [f64; 4],
    /// Grid step in degrees.
    pub grid_spacing_deg: f64,
    /// Explicit cell half extent in projected units; derived from the
    /// bounds when absent.
    pub cell_half_extent: Option<[f64; 2]>,
    pub initial_kind: OverlayKind,
    pub initial_opacity: f32,
    /// Initial map center as `[lng, lat]`.
    pub map_center: [f64; 2],
    pub map_zoom: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            dem_source: "assets/lassen-cropped-dem-data.tif".to_string(),
            bounds: [-121.62, 40.41, -121.42, 40.53],
            grid_spacing_deg: 0.00125 / 8.0,
            cell_half_extent: None,
            initial_kind: OverlayKind::Elevation,
            initial_opacity: 0.2,
            map_center: [-121.53, 40.46],
            map_zoom: 12.0,
        }
    }
}

impl OverlayConfig {
    /// Environment variable naming the native config file.
    pub const ENV_VAR: &'static str = "ALMANAC_CONFIG";

    /// localStorage key for the web config.
    pub const STORAGE_KEY: &'static str = "backcountry_almanac_config";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = match std::env::var(Self::ENV_VAR) {
            Ok(path) => path,
            Err(_) => return Self::default(),
        };

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path, e);
                return Self::default();
            }
        };

        Self::parse_or_default(&json, &path)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        Self::parse_or_default(&json, "localStorage")
    }

    fn parse_or_default(json: &str, origin: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded overlay config from {}", origin);
                config
            }
            Err(e) => {
                log::warn!("Failed to parse overlay config from {}: {}", origin, e);
                Self::default()
            }
        }
    }

    pub fn bounding_box(&self) -> Result<BoundingBox, TerrainError> {
        let [min_lng, min_lat, max_lng, max_lat] = self.bounds;
        BoundingBox::from_extent(min_lng, min_lat, max_lng, max_lat)
    }

    pub fn grid_spacing(&self) -> Result<GridSpacing, TerrainError> {
        GridSpacing::new(self.grid_spacing_deg)
    }

    /// Mesh builder for the configured extent.
    pub fn mesh_builder(&self) -> Result<OverlayMeshBuilder, TerrainError> {
        let builder = OverlayMeshBuilder::new(self.bounding_box()?, self.grid_spacing()?)?;
        Ok(match self.cell_half_extent {
            Some([x, y]) => builder.with_half_extent(DVec2::new(x, y)),
            None => builder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_lassen() {
        let config = OverlayConfig::default();
        let bounds = config.bounding_box().unwrap();
        assert_eq!(bounds.min().x, -121.62);
        assert_eq!(bounds.max().y, 40.53);
        assert_eq!(config.initial_kind, OverlayKind::Elevation);
        assert_eq!(config.initial_opacity, 0.2);
        assert_eq!(config.grid_spacing_deg, 0.00015625);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            OverlayConfig::from_json(r#"{ "initial_kind": "aspect", "initial_opacity": 0.5 }"#)
                .unwrap();
        assert_eq!(config.initial_kind, OverlayKind::Aspect);
        assert_eq!(config.initial_opacity, 0.5);
        assert_eq!(config.dem_source, OverlayConfig::default().dem_source);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(OverlayConfig::from_json("{ not json").is_err());
        assert!(OverlayConfig::from_json(r#"{ "initial_kind": "contours" }"#).is_err());
    }

    #[test]
    fn test_parse_or_default_falls_back() {
        let config = OverlayConfig::parse_or_default("[]", "test");
        assert_eq!(config, OverlayConfig::default());
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let config = OverlayConfig {
            grid_spacing_deg: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.mesh_builder(),
            Err(TerrainError::InvalidGridSpacing(_))
        ));

        let config = OverlayConfig {
            bounds: [-121.42, 40.41, -121.62, 40.53],
            ..Default::default()
        };
        assert!(matches!(
            config.mesh_builder(),
            Err(TerrainError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_unbuildable_spacing_rejected() {
        let config = OverlayConfig {
            bounds: [0.0, 0.0, 1.0, 1.0],
            grid_spacing_deg: 1e-10,
            ..Default::default()
        };
        assert!(matches!(
            config.mesh_builder(),
            Err(TerrainError::GridTooLarge(_))
        ));
        assert!(OverlayConfig::default().mesh_builder().is_ok());
    }

    #[test]
    fn test_explicit_half_extent() {
        let config = OverlayConfig {
            cell_half_extent: Some([1e-7, 2e-7]),
            ..Default::default()
        };
        let builder = config.mesh_builder().unwrap();
        assert_eq!(builder.half_extent(), DVec2::new(1e-7, 2e-7));
    }
}
