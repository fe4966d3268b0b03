//! PNG export of a software-rendered [`Framebuffer`].
//!
//! Feature-gated behind `png` (default on) so that WASM builds can depend
//! on the core crate without pulling in the `image` crate.

use std::path::Path;

use crate::error::RenderError;
use crate::pipeline::software::Framebuffer;

/// Writes a framebuffer as an 8-bit RGBA PNG, top row first.
///
/// Returns `RenderError::Io` on write failure.
pub fn write_png(framebuffer: &Framebuffer, path: &Path) -> Result<(), RenderError> {
    let img = image::RgbaImage::from_raw(
        framebuffer.width(),
        framebuffer.height(),
        framebuffer.to_rgba8(),
    )
    .ok_or_else(|| RenderError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| RenderError::Io(e.to_string()))?;
    log::info!("wrote {}x{} snapshot to {}", img.width(), img.height(), path.display());
    Ok(())
}
