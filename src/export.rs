//! Bitmap export of the sampled pixels.

use crate::raster::BinaryRaster;
use crate::Result;
use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const EXPORT_FILENAME: &str = "image.bmp";

/// Receives the encoded file. Stands in for a browser download or a file write.
pub trait SaveTarget {
    fn save(&mut self, bytes: &[u8], filename: &str) -> std::io::Result<()>;
}

/// Writes into a directory (using the suggested filename) or to an exact file path.
#[derive(Debug, Clone)]
pub struct PathTarget {
    path: PathBuf,
}

impl PathTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn resolve(&self, filename: &str) -> PathBuf {
        if self.path.is_dir() {
            self.path.join(filename)
        } else {
            self.path.clone()
        }
    }
}

impl SaveTarget for PathTarget {
    fn save(&mut self, bytes: &[u8], filename: &str) -> std::io::Result<()> {
        let path = self.resolve(filename);
        debug!("writing {} bytes to {}", bytes.len(), path.display());
        std::fs::write(path, bytes)
    }
}

/// Encodes `binary` as an uncompressed 24-bit BMP, each cell expanded to
/// `scale × scale` pixels. An empty raster encodes to no bytes.
pub fn encode_bmp(binary: &BinaryRaster, scale: u32) -> Result<Vec<u8>> {
    if binary.is_empty() {
        return Ok(Vec::new());
    }
    let rgb = DynamicImage::ImageRgba8(binary.to_rgba(scale)).to_rgb8();
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)?;
    Ok(bytes)
}

/// Encodes and hands the bitmap to `target` as [`EXPORT_FILENAME`].
///
/// Returns `Ok(false)` without touching the target when there is nothing to
/// save or encoding fails. Only errors raised by the target propagate.
pub fn export(binary: &BinaryRaster, scale: u32, target: &mut impl SaveTarget) -> Result<bool> {
    let bytes = match encode_bmp(binary, scale) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("bitmap encode failed, skipping save: {e}");
            return Ok(false);
        }
    };
    if bytes.is_empty() {
        debug!("no pixels to export");
        return Ok(false);
    }
    target.save(&bytes, EXPORT_FILENAME)?;
    Ok(true)
}
