//! Grid overlay drawn on top of the magnified source image.
//!
//! Grid lines get a solid black pass and then a white `[1, 1]` dashed pass so
//! they stay visible on any background. The two lines crossing at the origin
//! are drawn again, dashed in cyan, to mark the anchor.

use crate::geometry::{round_half_up, GeometryState, Vec2};
use crate::raster::Raster;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

pub const LINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const DASH_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const ANCHOR_COLOR: Rgba<u8> = Rgba([0, 255, 255, 255]);

/// Line positions for one overlay, in display pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPlan {
    pub width: u32,
    pub height: u32,
    /// x of every vertical grid line, ascending.
    pub columns: Vec<f64>,
    /// y of every horizontal grid line, ascending.
    pub rows: Vec<f64>,
    pub anchor: Vec2,
}

fn line_positions(start: f64, step: f64, end: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if !(step > 0.0) || !start.is_finite() {
        return out;
    }
    let mut pos = start;
    while pos < end {
        out.push(pos);
        pos += step;
    }
    out
}

impl OverlayPlan {
    /// Lays the grid out over a `image_w × image_h` source shown at the
    /// geometry's display scale.
    pub fn new(geometry: &GeometryState, image_w: u32, image_h: u32) -> Self {
        let scale = geometry.scale();
        let width = (image_w as f64 * scale).floor() as u32;
        let height = (image_h as f64 * scale).floor() as u32;
        let phase = geometry.phase();
        let cell = geometry.cell_size();
        let origin = geometry.origin();

        Self {
            width,
            height,
            columns: line_positions(phase.x * scale, cell.x * scale, width as f64),
            rows: line_positions(phase.y * scale, cell.y * scale, height as f64),
            anchor: Vec2::new(origin.x * scale, origin.y * scale),
        }
    }

    /// Rasterizes the plan onto a transparent canvas.
    pub fn render(&self) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width, self.height);
        self.draw_lines(&mut canvas, &self.columns, &self.rows, LINE_COLOR, false);
        self.draw_lines(&mut canvas, &self.columns, &self.rows, DASH_COLOR, true);
        self.draw_lines(&mut canvas, &[self.anchor.x], &[self.anchor.y], ANCHOR_COLOR, true);
        canvas
    }

    fn draw_lines(&self, canvas: &mut RgbaImage, columns: &[f64], rows: &[f64], color: Rgba<u8>, dashed: bool) {
        // [1, 1] dash: on at even offsets from the start of each line
        let ink = |t: u32| !dashed || t % 2 == 0;

        for &x in columns {
            let Some(px) = pixel_index(x, self.width) else { continue };
            for y in (0..self.height).filter(|&y| ink(y)) {
                canvas.put_pixel(px, y, color);
            }
        }
        for &y in rows {
            let Some(py) = pixel_index(y, self.height) else { continue };
            for x in (0..self.width).filter(|&x| ink(x)) {
                canvas.put_pixel(x, py, color);
            }
        }
    }
}

fn pixel_index(pos: f64, limit: u32) -> Option<u32> {
    let p = round_half_up(pos);
    (p >= 0.0 && p < limit as f64).then_some(p as u32)
}

/// Source magnified by the display scale (no smoothing) with the grid on top.
pub fn render_preview(source: &Raster, geometry: &GeometryState) -> RgbaImage {
    let plan = OverlayPlan::new(geometry, source.width(), source.height());
    let grid = plan.render();
    if plan.width == 0 || plan.height == 0 || source.width() == 0 || source.height() == 0 {
        return grid;
    }
    let mut base = imageops::resize(source, plan.width, plan.height, FilterType::Nearest);
    imageops::overlay(&mut base, &grid, 0, 0);
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(origin: (f64, f64), cell: (f64, f64), scale: f64) -> GeometryState {
        GeometryState::new(Vec2::new(origin.0, origin.1), Vec2::new(cell.0, cell.1), scale)
    }

    #[test]
    fn lines_start_at_phase() {
        let plan = OverlayPlan::new(&geometry((5.0, 0.0), (4.0, 8.0), 2.0), 16, 16);
        assert_eq!((plan.width, plan.height), (32, 32));
        assert_eq!(plan.columns, vec![2.0, 10.0, 18.0, 26.0]);
        assert_eq!(plan.rows, vec![0.0, 16.0]);
        assert_eq!(plan.anchor, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn empty_image_has_no_lines() {
        let plan = OverlayPlan::new(&GeometryState::default(), 0, 0);
        assert!(plan.columns.is_empty());
        assert!(plan.rows.is_empty());
        assert_eq!(plan.render().dimensions(), (0, 0));
    }

    #[test]
    fn lines_are_two_tone() {
        let plan = OverlayPlan::new(&geometry((0.0, 0.0), (4.0, 4.0), 1.0), 8, 8);
        let img = plan.render();
        // column x = 4 is an ordinary grid line
        assert_eq!(*img.get_pixel(4, 2), DASH_COLOR);
        assert_eq!(*img.get_pixel(4, 3), LINE_COLOR);
        // away from any line the canvas stays transparent
        assert_eq!(img.get_pixel(2, 2).0[3], 0);
    }

    #[test]
    fn anchor_is_highlighted() {
        let plan = OverlayPlan::new(&geometry((6.0, 2.0), (4.0, 4.0), 1.0), 8, 8);
        let img = plan.render();
        assert_eq!(*img.get_pixel(6, 4), ANCHOR_COLOR);
        assert_eq!(*img.get_pixel(6, 5), LINE_COLOR);
        assert_eq!(*img.get_pixel(0, 2), ANCHOR_COLOR);
    }

    #[test]
    fn preview_keeps_pixels_off_grid() {
        let source = RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]));
        let preview = render_preview(&source, &geometry((0.0, 0.0), (2.0, 2.0), 3.0));
        assert_eq!(preview.dimensions(), (12, 12));
        assert_eq!(*preview.get_pixel(1, 1), Rgba([200, 10, 10, 255]));
        assert_eq!(*preview.get_pixel(6, 1), LINE_COLOR);
    }
}
