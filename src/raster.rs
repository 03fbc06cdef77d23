//! Source and output pixel buffers.

use crate::{GridError, Result};
use image::{Rgba, RgbaImage};

/// Decoded source image: RGBA, one byte per channel, row-major.
pub type Raster = RgbaImage;

/// Wraps a raw RGBA buffer, checking `len == width * height * 4`.
pub fn raster_from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Raster> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(GridError::InvalidBuffer { expected, actual: data.len() });
    }
    RgbaImage::from_raw(width, height, data)
        .ok_or(GridError::InvalidBuffer { expected, actual: expected })
}

/// Thresholded output of the sampler, one bool per cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryRaster {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BinaryRaster {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, bits: vec![false; width as usize * height as usize] }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, on: bool) {
        let idx = self.index(x, y);
        self.bits[idx] = on;
    }

    /// Channel value of a cell: 255 when on, 0 when off.
    pub fn value(&self, x: u32, y: u32) -> u8 {
        if self.get(x, y) { 255 } else { 0 }
    }

    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Opaque RGBA image with every cell blown up to `scale × scale` pixels.
    /// Point sampling only; no smoothing between cells.
    pub fn to_rgba(&self, scale: u32) -> RgbaImage {
        let scale = scale.max(1);
        RgbaImage::from_fn(self.width * scale, self.height * scale, |px, py| {
            let v = self.value(px / scale, py / scale);
            Rgba([v, v, v, 255])
        })
    }

    /// One text line per row, `#` for on and `.` for off.
    pub fn to_text(&self) -> String {
        let mut rows = Vec::with_capacity(self.height as usize);
        for y in 0..self.height {
            let row: String = (0..self.width)
                .map(|x| if self.get(x, y) { '#' } else { '.' })
                .collect();
            rows.push(row);
        }
        rows.join("\n") + "\n"
    }
}
