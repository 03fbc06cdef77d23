//! Grid geometry: origin, cell size and display scale.

use serde::{Deserialize, Serialize};

pub const MIN_CELL: f64 = 1.0;
pub const MIN_SCALE: f64 = 1.0;
pub const MAX_SCALE: f64 = 10.0;

/// A pair of real values, used both for points and for sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rounds half-way cases towards positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Where the grid sits over the source image, in source pixel space.
///
/// All setters coerce their input into range instead of rejecting it:
/// cell sides never drop below one pixel and the scale stays in `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryState {
    origin: Vec2,
    cell_size: Vec2,
    scale: f64,
}

impl Default for GeometryState {
    fn default() -> Self {
        Self {
            origin: Vec2::new(0.0, 0.0),
            cell_size: Vec2::new(8.0, 8.0),
            scale: 2.0,
        }
    }
}

impl GeometryState {
    pub fn new(origin: Vec2, cell_size: Vec2, scale: f64) -> Self {
        let mut state = Self::default();
        state.set_origin(origin.x, origin.y);
        state.set_cell_size(cell_size.x, cell_size.y);
        state.set_scale(scale);
        state
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = Vec2::new(x, y);
    }

    pub fn set_cell_size(&mut self, w: f64, h: f64) {
        // f64::max drops NaN, so garbage input lands on the floor value
        self.cell_size = Vec2::new(w.max(MIN_CELL), h.max(MIN_CELL));
    }

    pub fn set_scale(&mut self, s: f64) {
        self.scale = s.max(MIN_SCALE).min(MAX_SCALE);
    }

    /// Top-left sampling phase: the origin reduced modulo the cell size.
    ///
    /// Uses the truncated remainder, so an origin left of or above the
    /// image yields a negative phase.
    pub fn phase(&self) -> Vec2 {
        Vec2::new(
            self.origin.x % self.cell_size.x,
            self.origin.y % self.cell_size.y,
        )
    }

    /// Converts a pointer position on the scaled display into source pixels.
    pub fn to_image_space(&self, display_x: f64, display_y: f64) -> Vec2 {
        Vec2::new(display_x / self.scale, display_y / self.scale)
    }

    /// Integer display factor used for nearest-neighbour expansion.
    pub fn pixel_scale(&self) -> u32 {
        round_half_up(self.scale) as u32
    }
}
