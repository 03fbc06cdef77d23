//! Ownership of the loaded source image.
//!
//! The host holds at most one decoded raster. Replacing or clearing it drops
//! the previous one. Loads are tagged with a ticket; a result that arrives
//! after a newer load (or a clear) has started is discarded.

use crate::raster::Raster;
use crate::{GridError, Result};
use image::ImageFormat;
use log::{debug, warn};

/// Value for a file picker's `accept` filter.
pub const ACCEPTED_MIME: &str = "image/png, image/jpeg, image/bmp";

/// Decodes png, jpeg or bmp bytes into an RGBA raster.
pub fn decode(bytes: &[u8]) -> Result<Raster> {
    let format = image::guess_format(bytes)?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp => {}
        other => return Err(GridError::UnsupportedFormat(format!("{other:?}"))),
    }
    Ok(image::load_from_memory_with_format(bytes, format)?.to_rgba8())
}

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }

    /// Rebuilds a ticket from an id handed across an FFI boundary.
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
pub struct ImageHost {
    current: Option<Raster>,
    generation: u64,
}

impl ImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.current.as_ref()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.current.as_ref().map_or((0, 0), |r| r.dimensions())
    }

    /// Starts a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Installs a decoded raster if `ticket` is still current.
    /// Returns `false` and drops the raster otherwise.
    pub fn finish_load(&mut self, ticket: LoadTicket, raster: Raster) -> bool {
        if !self.is_current(ticket) {
            warn!("discarding superseded image load #{}", ticket.0);
            return false;
        }
        debug!("image #{} ready: {}x{}", ticket.0, raster.width(), raster.height());
        self.replace(Some(raster));
        true
    }

    /// Decodes and installs `bytes` in one step, returning the image size.
    /// Bytes that fail to decode leave the current image and any pending
    /// load untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(u32, u32)> {
        let raster = decode(bytes)?;
        let ticket = self.begin_load();
        self.finish_load(ticket, raster);
        Ok(self.dimensions())
    }

    /// Releases the current image and invalidates pending loads.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.replace(None);
    }

    fn replace(&mut self, next: Option<Raster>) {
        if let Some(old) = self.current.take() {
            debug!("releasing {}x{} image", old.width(), old.height());
        }
        self.current = next;
    }
}
