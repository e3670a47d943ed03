//! Deterministic PNG writer.
//!
//! Uses fixed compression settings so the same packed bitmap always
//! encodes to the same bytes, and tags each file with how its samples
//! must be interpreted: an sRGB chunk for color textures, a linear gAMA
//! chunk for data textures.

use std::io::Write;
use std::path::Path;

use png::{
    BitDepth, ColorType, Compression, Encoder, FilterType, ScaledFloat, SrgbRenderingIntent,
};
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::packing::ColorSpace;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            // No filtering keeps output independent of encoder heuristics.
            filter: FilterType::NoFilter,
        }
    }
}

/// Write a bitmap as 8-bit RGBA to any writer.
pub fn write_rgba_to_writer<W: Write>(
    bitmap: &Bitmap,
    color_space: ColorSpace,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, bitmap.width(), bitmap.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    match color_space {
        ColorSpace::Srgb => encoder.set_srgb(SrgbRenderingIntent::Perceptual),
        ColorSpace::NonColor => encoder.set_source_gamma(ScaledFloat::new(1.0)),
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&bitmap.to_rgba8())?;

    Ok(())
}

/// Encode to a `Vec<u8>` and return the bytes with their hash.
pub fn write_rgba_to_vec_with_hash(
    bitmap: &Bitmap,
    color_space: ColorSpace,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_rgba_to_writer(bitmap, color_space, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Persists packed textures.
pub trait Persistence {
    /// Save `bitmap` to `path`, returning the BLAKE3 hash of the bytes written.
    fn save_png(
        &mut self,
        bitmap: &Bitmap,
        color_space: ColorSpace,
        path: &Path,
    ) -> Result<String, PngError>;
}

/// Writes PNG files to disk.
#[derive(Debug, Clone, Default)]
pub struct PngFileWriter {
    pub config: PngConfig,
}

impl Persistence for PngFileWriter {
    fn save_png(
        &mut self,
        bitmap: &Bitmap,
        color_space: ColorSpace,
        path: &Path,
    ) -> Result<String, PngError> {
        let (data, hash) = write_rgba_to_vec_with_hash(bitmap, color_space, &self.config)?;
        std::fs::write(path, data)?;
        Ok(hash)
    }
}
