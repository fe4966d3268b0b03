#![deny(unsafe_code)]
//! WASM bindings for bandplot.
//!
//! The page calls [`render_canvas`] once its canvas exists. The canvas
//! backing store size is the surface size; the reference scene is drawn
//! through a WebGL2 context with the same pipeline the CLI uses.

use bandplot_core::{RenderError, SurfaceSize};

/// Surface size for a canvas backing store.
///
/// # Errors
///
/// Returns `RenderError::UnsupportedSurface` for an empty or oversized
/// canvas.
pub fn canvas_surface(width: u32, height: u32) -> Result<SurfaceSize, RenderError> {
    SurfaceSize::new(width, height).map_err(|e| {
        RenderError::UnsupportedSurface(format!("canvas is {width}x{height}: {e}"))
    })
}

#[cfg(target_arch = "wasm32")]
mod web {
    use bandplot_core::{render_once, GlowBackend, RenderError, SceneData};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

    fn unsupported(msg: &str) -> RenderError {
        RenderError::UnsupportedSurface(msg.to_string())
    }

    fn to_js(e: RenderError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn acquire(canvas_id: &str) -> Result<(HtmlCanvasElement, WebGl2RenderingContext), RenderError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| unsupported("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| unsupported(&format!("no element with id '{canvas_id}'")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| unsupported(&format!("'{canvas_id}' is not a canvas")))?;
        let context = canvas
            .get_context("webgl2")
            .map_err(|_| unsupported("webgl2 context request failed"))?
            .ok_or_else(|| unsupported("WebGL2 not supported"))?
            .dyn_into::<WebGl2RenderingContext>()
            .map_err(|_| unsupported("context is not WebGL2"))?;
        Ok((canvas, context))
    }

    /// Draws the reference scene into the canvas with id `canvas_id`.
    ///
    /// Returns the number of shapes drawn.
    #[wasm_bindgen]
    pub fn render_canvas(canvas_id: &str) -> Result<u32, JsValue> {
        let (canvas, context) = acquire(canvas_id).map_err(to_js)?;
        let surface = super::canvas_surface(canvas.width(), canvas.height()).map_err(to_js)?;
        let gl = GlowBackend::new(glow::Context::from_webgl2_context(context))
            .map_err(|e| to_js(RenderError::UnsupportedSurface(e)))?;
        let stats = render_once(&gl, surface, &SceneData::reference()).map_err(to_js)?;
        if stats.skipped > 0 {
            log::warn!("{} shapes skipped", stats.skipped);
        }
        u32::try_from(stats.drawn).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::render_canvas;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_surface_accepts_default_canvas() {
        let size = canvas_surface(300, 150).unwrap();
        assert_eq!((size.width(), size.height()), (300, 150));
    }

    #[test]
    fn empty_canvas_is_unsupported_surface() {
        let err = canvas_surface(0, 150).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedSurface(_)), "got: {err}");
    }
}
