//! Decoded single-band DEM raster.

use crate::error::TerrainError;
use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

/// Elevation samples plus the georeferencing needed to locate them.
///
/// Samples are row-major: `samples[x + y * width]`, row 0 is the northern
/// edge.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    samples: Vec<f32>,
    pixel_scale: [f64; 3],
    tie_point: [f64; 6],
}

impl Raster {
    pub fn new(
        width: usize,
        height: usize,
        samples: Vec<f32>,
        pixel_scale: [f64; 3],
        tie_point: [f64; 6],
    ) -> Result<Self, TerrainError> {
        if samples.len() != width * height {
            return Err(TerrainError::Decode(format!(
                "expected {} samples for a {}x{} raster, got {}",
                width * height,
                width,
                height,
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            samples,
            pixel_scale,
            tie_point,
        })
    }

    /// Decodes the first band of the first image in a GeoTIFF.
    ///
    /// Requires the `ModelPixelScale` and `ModelTiepoint` tags; rasters
    /// georeferenced only through `ModelTransformation` are rejected.
    pub fn decode_geotiff(bytes: &[u8]) -> Result<Self, TerrainError> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions()?;
        let (width, height) = (width as usize, height as usize);

        let pixel_scale = decoder
            .get_tag_f64_vec(Tag::ModelPixelScaleTag)
            .map_err(|e| TerrainError::InvalidMetadata(format!("ModelPixelScale: {}", e)))?;
        let tie_point = decoder
            .get_tag_f64_vec(Tag::ModelTiepointTag)
            .map_err(|e| TerrainError::InvalidMetadata(format!("ModelTiepoint: {}", e)))?;

        let pixel_scale: [f64; 3] = pixel_scale
            .get(..3)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| {
                TerrainError::InvalidMetadata(format!(
                    "ModelPixelScale needs 3 values, got {}",
                    pixel_scale.len()
                ))
            })?;
        let tie_point: [f64; 6] = tie_point
            .get(..6)
            .and_then(|t| t.try_into().ok())
            .ok_or_else(|| {
                TerrainError::InvalidMetadata(format!(
                    "ModelTiepoint needs 6 values, got {}",
                    tie_point.len()
                ))
            })?;

        let interleaved = to_f32(decoder.read_image()?);
        let pixel_count = width * height;
        if pixel_count == 0 || interleaved.len() < pixel_count {
            return Err(TerrainError::Decode(format!(
                "raster {}x{} holds only {} samples",
                width,
                height,
                interleaved.len()
            )));
        }

        let bands = interleaved.len() / pixel_count;
        let samples = if bands == 1 {
            interleaved
        } else {
            log::debug!("Raster has {} interleaved bands, keeping the first", bands);
            interleaved.into_iter().step_by(bands).take(pixel_count).collect()
        };

        log::info!(
            "Decoded {}x{} DEM raster (scale {:?}, tie point {:?})",
            width,
            height,
            pixel_scale,
            tie_point
        );

        Self::new(width, height, samples, pixel_scale, tie_point)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_scale(&self) -> [f64; 3] {
        self.pixel_scale
    }

    pub fn tie_point(&self) -> [f64; 6] {
        self.tie_point
    }

    /// Sample at integer pixel coordinates, `None` outside the raster.
    pub fn get(&self, x: i64, y: i64) -> Option<f32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.samples.get(x as usize + y as usize * self.width).copied()
    }
}

fn to_f32(data: DecodingResult) -> Vec<f32> {
    match data {
        DecodingResult::U8(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::U16(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::U32(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::U64(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I8(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I16(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I32(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I64(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::F32(values) => values,
        DecodingResult::F64(values) => values.iter().map(|&v| v as f32).collect(),
    }
}
