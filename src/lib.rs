//! Monochrome pixel-art extraction by grid sampling.

pub mod export;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod overlay;
pub mod raster;
pub mod sampler;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use geometry::{GeometryState, Vec2};
pub use interaction::{DragState, InteractionController, PointerEvent};
pub use raster::{BinaryRaster, Raster};
pub use sampler::SampleSettings;
pub use session::Session;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;

/// One-shot extraction: samples a whole image under a fixed geometry.
pub struct Extractor {
    geometry: GeometryState,
    settings: SampleSettings,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(GeometryState::default())
    }
}

impl Extractor {
    pub fn new(geometry: GeometryState) -> Self {
        Self { geometry, settings: SampleSettings::default() }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.settings.threshold = threshold;
        self
    }

    pub fn with_invert(mut self, enabled: bool) -> Self {
        self.settings.invert = enabled;
        self
    }

    pub fn geometry(&self) -> &GeometryState {
        &self.geometry
    }

    pub fn extract(&self, image: &image::DynamicImage) -> BinaryRaster {
        let rgba = image.to_rgba8();
        sampler::sample_with(&rgba, &self.geometry, &self.settings)
    }
}
