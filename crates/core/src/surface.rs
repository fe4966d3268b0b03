//! Drawing-surface dimensions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Largest accepted width or height, matching the common
/// `MAX_RENDERBUFFER_SIZE` of WebGL2 contexts.
pub const MAX_SIDE: u32 = 16_384;

/// Largest accepted pixel count. Bounds the software framebuffer to
/// 256 MiB of RGBA `f32` storage.
pub const MAX_PIXELS: usize = 1 << 24;

/// Pixel size of the surface a context is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

impl SurfaceSize {
    /// Returns `InvalidDimensions` if either side is zero or above
    /// [`MAX_SIDE`], or if the pixel count exceeds [`MAX_PIXELS`].
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(RenderError::InvalidDimensions);
        }
        if width as usize * height as usize > MAX_PIXELS {
            return Err(RenderError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels on the surface.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The resolution uniform value.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_reference_size() {
        let size = SurfaceSize::new(800, 600).unwrap();
        assert_eq!(size.width(), 800);
        assert_eq!(size.height(), 600);
        assert_eq!(size.pixel_count(), 480_000);
        assert_eq!(size.resolution(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn new_rejects_zero_width() {
        assert!(matches!(
            SurfaceSize::new(0, 600),
            Err(RenderError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_rejects_zero_height() {
        assert!(matches!(
            SurfaceSize::new(800, 0),
            Err(RenderError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_rejects_sides_beyond_i32() {
        assert!(SurfaceSize::new(u32::MAX, 1).is_err());
    }

    #[test]
    fn new_rejects_long_thin_surface() {
        assert!(matches!(
            SurfaceSize::new(2_000_000_000, 1),
            Err(RenderError::InvalidDimensions)
        ));
        assert!(SurfaceSize::new(MAX_SIDE + 1, 1).is_err());
    }

    #[test]
    fn new_caps_total_pixels() {
        assert!(SurfaceSize::new(MAX_SIDE, MAX_SIDE).is_err());
        let widest = SurfaceSize::new(MAX_SIDE, (MAX_PIXELS / MAX_SIDE as usize) as u32).unwrap();
        assert_eq!(widest.pixel_count(), MAX_PIXELS);
    }
}
