//! CPU framebuffer and triangle rasterization.
//!
//! Window coordinates follow GL: origin at the bottom-left, pixel centers
//! at half-integers. Storage is row-major from the top row down so that
//! [`Framebuffer::pixel`] and [`Framebuffer::to_rgba8`] use image
//! orientation.

use glam::Vec2;

use crate::color::Rgba;
use crate::surface::SurfaceSize;

/// A vertex after the viewport transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterVertex {
    /// Window coordinates, origin bottom-left.
    pub position: Vec2,
    pub color: Rgba,
}

/// Integer window-space rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

/// RGBA `f32` color buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn lerp_color(c0: Rgba, c1: Rgba, c2: Rgba, w1: f32, w2: f32) -> Rgba {
    let [a0, a1, a2] = [c0, c1, c2].map(Rgba::to_array);
    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = a0[i] + (a1[i] - a0[i]) * w1 + (a2[i] - a0[i]) * w2;
    }
    Rgba::from(out)
}

impl Framebuffer {
    /// A framebuffer filled with transparent black.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            width: size.width(),
            height: size.height(),
            pixels: vec![Rgba::new(0.0, 0.0, 0.0, 0.0); size.pixel_count()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full window-space extent.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x0: 0,
            y0: 0,
            x1: self.width as i64,
            y1: self.height as i64,
        }
    }

    /// Color at `(x, y)` with `y` counted from the top row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// All pixels, top row first.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// 8-bit RGBA bytes, top row first, four bytes per pixel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    /// Rasterizes one triangle, sampling at pixel centers inside `clip`.
    ///
    /// Colors are interpolated barycentrically and overwrite the target.
    /// Degenerate triangles produce no fragments. Returns the number of
    /// pixels written.
    pub fn fill_triangle(&mut self, tri: [RasterVertex; 3], clip: Bounds) -> usize {
        let [v0, v1, v2] = tri;
        let (p0, p1, p2) = (v0.position, v1.position, v2.position);
        let area = edge(p0, p1, p2);
        if area == 0.0 || !area.is_finite() {
            return 0;
        }

        let min = p0.min(p1).min(p2);
        let max = p0.max(p1).max(p2);
        let clip = Bounds {
            x0: clip.x0.max(0),
            y0: clip.y0.max(0),
            x1: clip.x1.min(self.width as i64),
            y1: clip.y1.min(self.height as i64),
        };
        let x_lo = (min.x.floor() as i64).max(clip.x0);
        let x_hi = (max.x.ceil() as i64).min(clip.x1);
        let y_lo = (min.y.floor() as i64).max(clip.y0);
        let y_hi = (max.y.ceil() as i64).min(clip.y1);

        let mut written = 0;
        for gy in y_lo..y_hi {
            let row = (self.height as i64 - 1 - gy) as usize;
            for gx in x_lo..x_hi {
                let p = Vec2::new(gx as f32 + 0.5, gy as f32 + 0.5);
                let w0 = edge(p1, p2, p) / area;
                let w1 = edge(p2, p0, p) / area;
                let w2 = edge(p0, p1, p) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let color = lerp_color(v0.color, v1.color, v2.color, w1, w2);
                self.pixels[row * self.width as usize + gx as usize] = color;
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fb(w: u32, h: u32) -> Framebuffer {
        Framebuffer::new(SurfaceSize::new(w, h).unwrap())
    }

    fn v(x: f32, y: f32, color: Rgba) -> RasterVertex {
        RasterVertex {
            position: Vec2::new(x, y),
            color,
        }
    }

    #[test]
    fn new_framebuffer_is_transparent_black() {
        let buf = fb(3, 2);
        assert_eq!(buf.pixels().len(), 6);
        assert!(buf.pixels().iter().all(|p| p.to_array() == [0.0; 4]));
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let buf = fb(3, 2);
        assert!(buf.pixel(3, 0).is_none());
        assert!(buf.pixel(0, 2).is_none());
    }

    #[test]
    fn to_rgba8_has_four_bytes_per_pixel() {
        let mut buf = fb(4, 4);
        buf.fill(Rgba::RED);
        let bytes = buf.to_rgba8();
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn triangle_covers_pixel_centers_inside_it() {
        let mut buf = fb(4, 4);
        let tri = [v(0.0, 0.0, Rgba::GREEN), v(4.0, 0.0, Rgba::GREEN), v(0.0, 4.0, Rgba::GREEN)];
        let bounds = buf.bounds();
        let written = buf.fill_triangle(tri, bounds);
        // Centers with x + y <= 4 - 1: (0.5,0.5).. i.e. gx + gy <= 3.
        assert_eq!(written, 10);
        // Window row 0 is the bottom storage row.
        assert_eq!(buf.pixel(0, 3), Some(Rgba::GREEN));
        assert_eq!(buf.pixel(3, 0).map(|c| c.a), Some(0.0));
    }

    #[test]
    fn winding_does_not_matter() {
        let mut a = fb(4, 4);
        let mut b = fb(4, 4);
        let p = [v(0.0, 0.0, Rgba::RED), v(4.0, 0.0, Rgba::RED), v(0.0, 4.0, Rgba::RED)];
        let bounds = a.bounds();
        a.fill_triangle(p, bounds);
        b.fill_triangle([p[0], p[2], p[1]], bounds);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_triangle_writes_nothing() {
        let mut buf = fb(4, 4);
        let tri = [v(0.0, 0.0, Rgba::RED), v(2.0, 2.0, Rgba::RED), v(4.0, 4.0, Rgba::RED)];
        let bounds = buf.bounds();
        assert_eq!(buf.fill_triangle(tri, bounds), 0);
    }

    #[test]
    fn colors_interpolate_across_triangle() {
        let mut buf = fb(2, 1);
        let black = Rgba::BLACK;
        let white = Rgba::WHITE;
        // Covers pixel (0, 0) but not (1, 0); color depends only on x.
        let tri = [v(0.0, -10.0, black), v(2.0, -10.0, white), v(0.0, 10.0, black)];
        let bounds = buf.bounds();
        buf.fill_triangle(tri, bounds);
        let left = buf.pixel(0, 0).unwrap();
        assert!((left.r - 0.25).abs() < 1e-5, "left: {left:?}");
        assert_eq!(buf.pixel(1, 0).map(|c| c.a), Some(0.0));
    }

    #[test]
    fn clip_bounds_limit_writes() {
        let mut buf = fb(4, 4);
        let tri = [v(-10.0, -10.0, Rgba::RED), v(20.0, -10.0, Rgba::RED), v(-10.0, 20.0, Rgba::RED)];
        let clip = Bounds { x0: 0, y0: 0, x1: 2, y1: 2 };
        assert_eq!(buf.fill_triangle(tri, clip), 4);
    }
}
