//! WebAssembly bindings for gridbit

use crate::export::SaveTarget;
use crate::host::{self, LoadTicket};
use crate::interaction::PointerEvent;
use crate::raster::raster_from_rgba;
use crate::session::Session;
use crate::SampleSettings;
use wasm_bindgen::prelude::*;

fn to_js(e: crate::GridError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Keeps the last encoded file so JS can turn it into a download.
#[derive(Default)]
struct Download {
    bytes: Vec<u8>,
    filename: String,
}

impl SaveTarget for Download {
    fn save(&mut self, bytes: &[u8], filename: &str) -> std::io::Result<()> {
        self.bytes = bytes.to_vec();
        self.filename = filename.to_string();
        Ok(())
    }
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSession {
        WasmSession { session: Session::new() }
    }

    /// `accept` filter for the file picker
    #[wasm_bindgen]
    pub fn accepted_mime() -> String {
        host::ACCEPTED_MIME.to_string()
    }

    /// Decode and install an encoded png/jpeg/bmp file
    #[wasm_bindgen]
    pub fn load_file(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.session.load_bytes(bytes).map(|_| ()).map_err(to_js)
    }

    /// Mark the start of an asynchronous browser decode; pass the returned
    /// id to `finish_load`. Earlier unfinished decodes become stale.
    #[wasm_bindgen]
    pub fn begin_load(&mut self) -> f64 {
        // ids stay exact in a JS number up to 2^53
        self.session.begin_load().id() as f64
    }

    /// Install RGBA pixels from the decode `load_id`.
    /// Returns false when a newer load or a clear superseded it.
    #[wasm_bindgen]
    pub fn finish_load(&mut self, load_id: f64, image_data: &[u8], width: u32, height: u32) -> Result<bool, JsValue> {
        let raster = raster_from_rgba(width, height, image_data.to_vec()).map_err(to_js)?;
        Ok(self.session.finish_load(LoadTicket::from_id(load_id as u64), raster))
    }

    /// Picker closed without a file, or component torn down
    #[wasm_bindgen]
    pub fn clear_image(&mut self) {
        self.session.clear_image();
    }

    #[wasm_bindgen]
    pub fn set_scale(&mut self, scale: f64) {
        self.session.set_scale(scale);
    }

    #[wasm_bindgen]
    pub fn scale(&self) -> f64 {
        self.session.geometry().scale()
    }

    #[wasm_bindgen]
    pub fn set_threshold(&mut self, threshold: u8, invert: bool) {
        self.session.set_settings(SampleSettings { threshold, invert });
    }

    /// Pointer coordinates are relative to the grid canvas, in display pixels
    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool) {
        self.session.pointer_down(PointerEvent::new(x, y, shift));
    }

    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.session.pointer_move(PointerEvent::new(x, y, false));
    }

    #[wasm_bindgen]
    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    /// Grid overlay canvas as RGBA; size from `overlay_width`/`overlay_height`
    #[wasm_bindgen]
    pub fn overlay_rgba(&self) -> Vec<u8> {
        self.session.overlay().render().into_raw()
    }

    #[wasm_bindgen]
    pub fn overlay_width(&self) -> u32 {
        self.session.overlay().width
    }

    #[wasm_bindgen]
    pub fn overlay_height(&self) -> u32 {
        self.session.overlay().height
    }

    /// Sampled pixels at display scale as RGBA
    #[wasm_bindgen]
    pub fn extracted_rgba(&self) -> Vec<u8> {
        self.session.extracted().into_raw()
    }

    #[wasm_bindgen]
    pub fn extracted_width(&self) -> u32 {
        self.session.binary().width() * self.session.geometry().pixel_scale()
    }

    #[wasm_bindgen]
    pub fn extracted_height(&self) -> u32 {
        self.session.binary().height() * self.session.geometry().pixel_scale()
    }

    /// Returns `{ bytes, filename }` for a download, or undefined when there
    /// is nothing to save.
    #[wasm_bindgen]
    pub fn export_bmp(&self) -> Result<JsValue, JsValue> {
        let mut download = Download::default();
        if !self.session.export(&mut download).map_err(to_js)? {
            web_sys::console::warn_1(&"nothing to export".into());
            return Ok(JsValue::UNDEFINED);
        }
        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"bytes".into(), &js_sys::Uint8Array::from(&download.bytes[..]))?;
        js_sys::Reflect::set(&result, &"filename".into(), &download.filename.into())?;
        Ok(result.into())
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}
