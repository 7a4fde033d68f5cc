//! Elevation queries against a decoded DEM.

use super::raster::Raster;
use super::transform::{snap_to_pixel, CoordinateTransform};
use crate::error::{SampleError, TerrainError};

/// Anything that can answer "how high is the ground here?".
///
/// The mesh builder only depends on this, so it can be fed by a sampler, a
/// flat test surface or a procedural one.
pub trait ElevationSource {
    /// Elevation in metres at (lng, lat); `0.0` when unknown.
    fn elevation(&self, lng: f64, lat: f64) -> f32;

    fn is_ready(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct LoadedRaster {
    raster: Raster,
    transform: CoordinateTransform,
}

/// Answers elevation queries for geographic coordinates.
///
/// Starts out empty; until [`ElevationSampler::initialize`] succeeds every
/// query fails with [`SampleError::NotReady`] (the soft variants return 0).
#[derive(Debug, Clone, Default)]
pub struct ElevationSampler {
    loaded: Option<LoadedRaster>,
}

impl ElevationSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ready sampler from an already decoded raster.
    pub fn from_raster(raster: Raster) -> Result<Self, TerrainError> {
        let mut sampler = Self::new();
        sampler.load(raster)?;
        Ok(sampler)
    }

    /// Decodes GeoTIFF bytes and makes the sampler ready.
    ///
    /// On failure the sampler keeps whatever state it had before.
    pub fn initialize(&mut self, bytes: &[u8]) -> Result<(), TerrainError> {
        let raster = Raster::decode_geotiff(bytes)?;
        self.load(raster)
    }

    fn load(&mut self, raster: Raster) -> Result<(), TerrainError> {
        let transform =
            CoordinateTransform::from_raster_metadata(raster.pixel_scale(), raster.tie_point())?;
        log::info!(
            "Elevation sampler ready: {}x{} samples",
            raster.width(),
            raster.height()
        );
        self.loaded = Some(LoadedRaster { raster, transform });
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.loaded.is_some()
    }

    /// Raster (width, height), `None` before initialization.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.loaded
            .as_ref()
            .map(|l| (l.raster.width(), l.raster.height()))
    }

    pub fn transform(&self) -> Option<&CoordinateTransform> {
        self.loaded.as_ref().map(|l| &l.transform)
    }

    /// Sample of the pixel containing (lng, lat), using truncated pixel
    /// coordinates.
    pub fn try_elevation_nearest(&self, lng: f64, lat: f64) -> Result<f32, SampleError> {
        let loaded = self.loaded.as_ref().ok_or(SampleError::NotReady)?;
        let (x, y) = loaded.transform.to_pixel_int(lng, lat);
        loaded.raster.get(x, y).ok_or(SampleError::OutOfBounds {
            lng,
            lat,
            x: x as f64,
            y: y as f64,
        })
    }

    /// Bilinear interpolation between the four pixels surrounding
    /// (lng, lat). All four must lie inside the raster.
    pub fn try_elevation_bilinear(&self, lng: f64, lat: f64) -> Result<f32, SampleError> {
        let loaded = self.loaded.as_ref().ok_or(SampleError::NotReady)?;
        let (x, y) = loaded.transform.to_pixel(lng, lat);
        let (x, y) = (snap_to_pixel(x), snap_to_pixel(y));
        let out_of_bounds = SampleError::OutOfBounds { lng, lat, x, y };

        if !x.is_finite() || !y.is_finite() {
            return Err(out_of_bounds);
        }

        let x0 = x.floor() as i64;
        let x1 = x.ceil() as i64;
        let y0 = y.floor() as i64;
        let y1 = y.ceil() as i64;

        let raster = &loaded.raster;
        let (q00, q10, q01, q11) = match (
            raster.get(x0, y0),
            raster.get(x1, y0),
            raster.get(x0, y1),
            raster.get(x1, y1),
        ) {
            (Some(q00), Some(q10), Some(q01), Some(q11)) => (q00, q10, q01, q11),
            _ => return Err(out_of_bounds),
        };

        let tx = (x - x0 as f64) as f32;
        let ty = (y - y0 as f64) as f32;
        let r1 = lerp(q00, q10, tx);
        let r2 = lerp(q01, q11, tx);
        Ok(lerp(r1, r2, ty))
    }

    /// Like [`Self::try_elevation_nearest`], returning 0 on failure.
    pub fn elevation_nearest(&self, lng: f64, lat: f64) -> f32 {
        self.try_elevation_nearest(lng, lat)
            .unwrap_or_else(sentinel)
    }

    /// Like [`Self::try_elevation_bilinear`], returning 0 on failure.
    pub fn elevation_bilinear(&self, lng: f64, lat: f64) -> f32 {
        self.try_elevation_bilinear(lng, lat)
            .unwrap_or_else(sentinel)
    }
}

impl ElevationSource for ElevationSampler {
    fn elevation(&self, lng: f64, lat: f64) -> f32 {
        self.elevation_bilinear(lng, lat)
    }

    fn is_ready(&self) -> bool {
        ElevationSampler::is_ready(self)
    }
}

fn sentinel(err: SampleError) -> f32 {
    log::debug!("Elevation query failed: {}", err);
    0.0
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
