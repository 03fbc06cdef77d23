//! Grid sampling - reduces every grid cell of the source to one on/off pixel.

use crate::geometry::{round_half_up, GeometryState, Vec2};
use crate::raster::{BinaryRaster, Raster};

/// A cell is on when any channel mean exceeds this value.
pub const DEFAULT_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSettings {
    pub threshold: u8,
    /// Swap on and off after thresholding.
    pub invert: bool,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, invert: false }
    }
}

/// Half-open source pixel rectangle `[x0, x1) × [y0, y1)` covered by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CellRect {
    pub fn area(&self) -> u64 {
        (self.x1 - self.x0) as u64 * (self.y1 - self.y0) as u64
    }
}

fn usable(cell: Vec2) -> bool {
    cell.x.is_finite() && cell.y.is_finite() && cell.x > 0.0 && cell.y > 0.0
}

/// Upper bound on output cells per source pixel. Grids finer than this
/// (cells well under a quarter pixel a side) sample nothing.
pub const MAX_CELLS_PER_PIXEL: u64 = 16;

/// Number of whole-ish cells that fit between the phase and the far edge.
/// Never negative; a non-positive or non-finite cell side, or a grid with
/// more than [`MAX_CELLS_PER_PIXEL`] cells per source pixel, gives `(0, 0)`.
pub fn output_size(width: u32, height: u32, phase: Vec2, cell: Vec2) -> (u32, u32) {
    if !usable(cell) {
        return (0, 0);
    }
    let w = round_half_up((width as f64 - phase.x) / cell.x);
    let h = round_half_up((height as f64 - phase.y) / cell.y);
    if w <= 0.0 || h <= 0.0 || !w.is_finite() || !h.is_finite() {
        return (0, 0);
    }
    let (w, h) = (w as u32, h as u32);
    let cells = (w as u64).saturating_mul(h as u64);
    let budget = MAX_CELLS_PER_PIXEL
        .saturating_mul(width as u64 + 1)
        .saturating_mul(height as u64 + 1);
    if cells > budget {
        return (0, 0);
    }
    (w, h)
}

/// Source rectangle of output cell `(x, y)`, clipped to a `width × height` image.
///
/// Each edge is rounded independently, so neighbouring cells share edges
/// exactly and never overlap.
pub fn cell_rect(phase: Vec2, cell: Vec2, x: u32, y: u32, width: u32, height: u32) -> CellRect {
    let edge = |start: f64, step: f64, i: u32, limit: u32| -> u32 {
        round_half_up(start + i as f64 * step).max(0.0).min(limit as f64) as u32
    };
    let x0 = edge(phase.x, cell.x, x, width);
    let x1 = edge(phase.x, cell.x, x + 1, width).max(x0);
    let y0 = edge(phase.y, cell.y, y, height);
    let y1 = edge(phase.y, cell.y, y + 1, height).max(y0);
    CellRect { x0, y0, x1, y1 }
}

/// Averages R, G and B over `rect` and reports whether any mean is above
/// `threshold`. Alpha is ignored. An empty rectangle is off.
pub fn cell_is_on(raster: &Raster, rect: CellRect, threshold: u8) -> bool {
    let count = rect.area();
    if count == 0 {
        return false;
    }
    let mut sums = [0u64; 3];
    for iy in rect.y0..rect.y1 {
        for ix in rect.x0..rect.x1 {
            let px = raster.get_pixel(ix, iy).0;
            sums[0] += px[0] as u64;
            sums[1] += px[1] as u64;
            sums[2] += px[2] as u64;
        }
    }
    // sum / count > t  <=>  sum > t * count
    let limit = threshold as u64 * count;
    sums.iter().any(|&s| s > limit)
}

/// Samples with an explicit origin and cell size, without the one-pixel
/// floor that [`GeometryState`] enforces.
pub fn sample_grid(raster: &Raster, origin: Vec2, cell: Vec2, settings: &SampleSettings) -> BinaryRaster {
    if !usable(cell) {
        return BinaryRaster::empty();
    }
    let phase = Vec2::new(origin.x % cell.x, origin.y % cell.y);
    let (width, height) = raster.dimensions();
    let (out_w, out_h) = output_size(width, height, phase, cell);
    if out_w == 0 || out_h == 0 {
        return BinaryRaster::empty();
    }

    let mut out = BinaryRaster::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let rect = cell_rect(phase, cell, x, y, width, height);
            let on = cell_is_on(raster, rect, settings.threshold);
            out.set(x, y, on != settings.invert);
        }
    }
    out
}

/// Samples `raster` under `geometry` with the default threshold.
pub fn sample(raster: &Raster, geometry: &GeometryState) -> BinaryRaster {
    sample_with(raster, geometry, &SampleSettings::default())
}

pub fn sample_with(raster: &Raster, geometry: &GeometryState, settings: &SampleSettings) -> BinaryRaster {
    sample_grid(raster, geometry.origin(), geometry.cell_size(), settings)
}
