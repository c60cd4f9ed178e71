// GL Utilities
// Helper functions for common context operations
// - Clearing the canvas
// - Uploading static vertex data
// - Turning pending GL errors into sketch errors
// - Waiting for the browser to lay out freshly mounted canvases

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::error::{SketchError, SketchResult};
use crate::gpu::context::GlContext;

pub fn clear_screen<C: GlContext>(ctx: &C, color: [f32; 4]) {
    ctx.clear_color(color);
    ctx.clear_color_buffer();
}

/// Creates a buffer holding `data` and leaves it bound as the array buffer.
pub fn create_static_buffer<C: GlContext>(ctx: &C, data: &[f32]) -> SketchResult<C::Buffer> {
    let buffer = ctx.create_buffer().ok_or(SketchError::BufferCreation)?;
    ctx.bind_array_buffer(Some(&buffer));
    ctx.array_buffer_data(data);
    Ok(buffer)
}

/// Reads the context error flag, logging and returning it when set.
pub fn check_error<C: GlContext>(ctx: &C, during: &'static str) -> SketchResult<()> {
    match ctx.error() {
        None => Ok(()),
        Some(code) => {
            log::warn!("GL error 0x{:04x} during {}", code, during);
            Err(SketchError::Gl { code, during })
        }
    }
}

pub fn canvas_by_id(id: &str) -> SketchResult<HtmlCanvasElement> {
    let window = web_sys::window().ok_or_else(|| SketchError::MissingElement("window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| SketchError::MissingElement("document".to_string()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| SketchError::MissingElement(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| SketchError::MissingElement(format!("{} (not a canvas)", id)))
}

pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

/// Resolves on the next animation frame, once the DOM has been rendered.
pub async fn next_animation_frame() -> Result<(), JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(&resolve);
        }
    });
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(())
}
