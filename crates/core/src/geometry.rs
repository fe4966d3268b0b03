//! Pixel-space to clip-space transform and the per-draw quad representation.
//!
//! Every shape resolves to exactly four vertices in triangle-strip order:
//! top-left, top-right, bottom-left, bottom-right. Pixel space has its
//! origin at the top-left of the surface with Y pointing down; clip space
//! is [-1, 1] on both axes with Y pointing up.

use glam::Vec2;

/// Number of vertices in every quad.
pub const QUAD_VERTICES: usize = 4;
/// Floats per vertex in the position stream.
pub const POSITION_COMPONENTS: usize = 2;
/// Floats per vertex in the color stream.
pub const COLOR_COMPONENTS: usize = 4;

/// Maps a pixel-space position to clip space for a surface of the given
/// resolution.
///
/// Mirrors the vertex stage: `(position / resolution * 2 - 1) * (1, -1)`.
pub fn pixel_to_clip(position: Vec2, resolution: Vec2) -> Vec2 {
    let zero_to_one = position / resolution;
    let zero_to_two = zero_to_one * 2.0;
    let clip = zero_to_two - Vec2::ONE;
    clip * Vec2::new(1.0, -1.0)
}

/// Flat vertex streams for one four-vertex triangle-strip draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadGeometry {
    /// Interleaved X, Y pairs in pixel space.
    pub positions: [f32; QUAD_VERTICES * POSITION_COMPONENTS],
    /// Interleaved R, G, B, A per vertex.
    pub colors: [f32; QUAD_VERTICES * COLOR_COMPONENTS],
}

impl QuadGeometry {
    /// Builds the streams from per-vertex corners and colors.
    pub fn from_vertices(corners: [Vec2; QUAD_VERTICES], colors: [[f32; 4]; QUAD_VERTICES]) -> Self {
        let mut positions = [0.0; QUAD_VERTICES * POSITION_COMPONENTS];
        for (dst, corner) in positions.chunks_exact_mut(POSITION_COMPONENTS).zip(corners) {
            dst.copy_from_slice(&corner.to_array());
        }
        let mut flat_colors = [0.0; QUAD_VERTICES * COLOR_COMPONENTS];
        for (dst, color) in flat_colors.chunks_exact_mut(COLOR_COMPONENTS).zip(colors) {
            dst.copy_from_slice(&color);
        }
        Self {
            positions,
            colors: flat_colors,
        }
    }

    /// Vertex count implied by each stream, as `(positions, colors)`.
    pub fn vertex_counts(&self) -> (usize, usize) {
        (
            self.positions.len() / POSITION_COMPONENTS,
            self.colors.len() / COLOR_COMPONENTS,
        )
    }

    /// Returns the corner at `index` (0..4).
    pub fn corner(&self, index: usize) -> Vec2 {
        let i = index * POSITION_COMPONENTS;
        Vec2::new(self.positions[i], self.positions[i + 1])
    }
}
