//! Per-shape draw protocol.
//!
//! For each shape: derive its quad, upload positions, upload colors, point
//! both attribute streams at their buffers, then issue one four-vertex
//! triangle strip. The uploads must precede the draw that reads them.

use super::backend::{DrawMode, GraphicsBackend};
use super::shader::ProgramLocations;
use super::uploader::GeometryUploader;
use crate::error::RenderError;
use crate::geometry::{QuadGeometry, COLOR_COMPONENTS, POSITION_COMPONENTS, QUAD_VERTICES};
use crate::scene::Shape;

/// Draws shapes through a shared uploader and a resolved program.
///
/// Borrows everything it needs; the caller is responsible for having
/// activated the program and set its uniforms.
pub struct ShapeDrawer<'a, B: GraphicsBackend> {
    gl: &'a B,
    locations: &'a ProgramLocations<B::UniformLocation>,
    uploader: &'a GeometryUploader<B>,
}

impl<'a, B: GraphicsBackend> ShapeDrawer<'a, B> {
    pub fn new(
        gl: &'a B,
        locations: &'a ProgramLocations<B::UniformLocation>,
        uploader: &'a GeometryUploader<B>,
    ) -> Self {
        Self {
            gl,
            locations,
            uploader,
        }
    }

    /// Derives the shape's quad and draws it.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::MalformedShape` (index 0) if the descriptor is
    /// invalid; nothing is uploaded or drawn in that case.
    pub fn draw(&self, shape: &Shape) -> Result<(), RenderError> {
        let quad = shape.geometry()?;
        self.draw_quad(&quad)
    }

    /// Uploads and draws an already derived quad.
    ///
    /// `QuadGeometry` streams are fixed-size arrays, so both always hold
    /// exactly [`QUAD_VERTICES`] vertices.
    pub fn draw_quad(&self, quad: &QuadGeometry) -> Result<(), RenderError> {
        let gl = self.gl;

        self.uploader.upload_positions(gl, &quad.positions)?;
        gl.enable_vertex_attrib_array(self.locations.position);
        gl.vertex_attrib_pointer_f32(self.locations.position, POSITION_COMPONENTS as i32, 0, 0);

        self.uploader.upload_colors(gl, &quad.colors)?;
        gl.enable_vertex_attrib_array(self.locations.color);
        gl.vertex_attrib_pointer_f32(self.locations.color, COLOR_COMPONENTS as i32, 0, 0);

        gl.draw_arrays(DrawMode::TriangleStrip, 0, QUAD_VERTICES as i32);
        Ok(())
    }
}
