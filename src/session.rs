//! Interactive extraction state.
//!
//! Every mutation re-derives the sampled output before returning, so
//! [`Session::binary`] always matches the current image and geometry.

use crate::export::{self, SaveTarget};
use crate::geometry::GeometryState;
use crate::host::{ImageHost, LoadTicket};
use crate::interaction::{DragState, InteractionController, PointerEvent};
use crate::overlay::{self, OverlayPlan};
use crate::raster::{BinaryRaster, Raster};
use crate::sampler::{self, SampleSettings};
use crate::Result;
use image::RgbaImage;
use log::debug;

#[derive(Debug, Default)]
pub struct Session {
    host: ImageHost,
    geometry: GeometryState,
    controller: InteractionController,
    settings: SampleSettings,
    binary: BinaryRaster,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: SampleSettings) -> Self {
        self.settings = settings;
        self.recompute();
        self
    }

    pub fn geometry(&self) -> &GeometryState {
        &self.geometry
    }

    pub fn settings(&self) -> &SampleSettings {
        &self.settings
    }

    pub fn binary(&self) -> &BinaryRaster {
        &self.binary
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.host.raster()
    }

    pub fn drag_state(&self) -> DragState {
        self.controller.state()
    }

    // --- image lifecycle ---

    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(u32, u32)> {
        let size = self.host.load_bytes(bytes)?;
        self.recompute();
        Ok(size)
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.host.begin_load()
    }

    /// Applies a decode result unless a newer load superseded it.
    pub fn finish_load(&mut self, ticket: LoadTicket, raster: Raster) -> bool {
        let applied = self.host.finish_load(ticket, raster);
        if applied {
            self.recompute();
        }
        applied
    }

    pub fn clear_image(&mut self) {
        self.host.clear();
        self.recompute();
    }

    // --- geometry ---

    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.geometry.set_origin(x, y);
        self.recompute();
    }

    pub fn set_cell_size(&mut self, w: f64, h: f64) {
        self.geometry.set_cell_size(w, h);
        self.recompute();
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.geometry.set_scale(scale);
        self.recompute();
    }

    pub fn set_settings(&mut self, settings: SampleSettings) {
        self.settings = settings;
        self.recompute();
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.controller.pointer_down(event, &mut self.geometry) {
            self.recompute();
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.controller.pointer_move(event, &mut self.geometry) {
            self.recompute();
        }
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    // --- derived views ---

    pub fn overlay(&self) -> OverlayPlan {
        let (w, h) = self.host.dimensions();
        OverlayPlan::new(&self.geometry, w, h)
    }

    /// Magnified source with the grid drawn on it, if an image is loaded.
    pub fn preview(&self) -> Option<RgbaImage> {
        self.host.raster().map(|r| overlay::render_preview(r, &self.geometry))
    }

    /// Sampled pixels at display scale, as shown next to the source.
    pub fn extracted(&self) -> RgbaImage {
        self.binary.to_rgba(self.geometry.pixel_scale())
    }

    pub fn export(&self, target: &mut impl SaveTarget) -> Result<bool> {
        export::export(&self.binary, self.geometry.pixel_scale(), target)
    }

    fn recompute(&mut self) {
        self.binary = match self.host.raster() {
            Some(raster) => sampler::sample_with(raster, &self.geometry, &self.settings),
            None => BinaryRaster::empty(),
        };
        debug!(
            "resampled to {}x{} ({} on)",
            self.binary.width(),
            self.binary.height(),
            self.binary.count_on()
        );
    }
}
