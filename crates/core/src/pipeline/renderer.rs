//! One-shot frame orchestration.
//!
//! [`SceneRenderer`] owns the program and the vertex buffers. A frame sets
//! the viewport, clears to opaque black, activates the program, sets the
//! resolution uniform, then draws every background followed by every
//! point, each group in list order. Later draws overwrite earlier ones.

use super::backend::GraphicsBackend;
use super::drawer::ShapeDrawer;
use super::shader::ShaderProgram;
use super::uploader::GeometryUploader;
use crate::color::Rgba;
use crate::error::RenderError;
use crate::scene::{Background, PointMarker, SceneData, Shape};
use crate::surface::SurfaceSize;

/// The color every frame starts from.
pub const CLEAR_COLOR: Rgba = Rgba::BLACK;

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Shapes that reached a draw call.
    pub drawn: usize,
    /// Shapes skipped because their descriptor was malformed.
    pub skipped: usize,
}

/// Owns the rendering resources for one drawing surface.
pub struct SceneRenderer<B: GraphicsBackend> {
    program: ShaderProgram<B>,
    uploader: GeometryUploader<B>,
}

impl<B: GraphicsBackend> SceneRenderer<B> {
    /// Builds the flat-color program and allocates the vertex buffers.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Shader` if the program is unusable, or
    /// `RenderError::Resource` if buffers cannot be allocated (the program
    /// is released in that case).
    pub fn new(gl: &B) -> Result<Self, RenderError> {
        let program = ShaderProgram::flat(gl)?;
        let uploader = match GeometryUploader::new(gl) {
            Ok(uploader) => uploader,
            Err(e) => {
                program.destroy(gl);
                return Err(e);
            }
        };
        Ok(Self { program, uploader })
    }

    /// Assembles a renderer from parts built elsewhere, e.g. a custom
    /// program exposing the same slots.
    pub fn from_parts(program: ShaderProgram<B>, uploader: GeometryUploader<B>) -> Self {
        Self { program, uploader }
    }

    pub fn program(&self) -> &ShaderProgram<B> {
        &self.program
    }

    pub fn uploader(&self) -> &GeometryUploader<B> {
        &self.uploader
    }

    /// Renders one frame.
    ///
    /// Malformed shapes are logged and skipped; they never abort the frame.
    pub fn render_frame(
        &self,
        gl: &B,
        surface: SurfaceSize,
        backgrounds: &[Background],
        points: &[PointMarker],
    ) -> FrameStats {
        gl.viewport(0, 0, surface.width() as i32, surface.height() as i32);
        gl.clear_color(CLEAR_COLOR.r, CLEAR_COLOR.g, CLEAR_COLOR.b, CLEAR_COLOR.a);
        gl.clear_color_buffer();

        self.program.activate(gl);
        self.program.set_resolution(gl, surface.resolution());

        let drawer = ShapeDrawer::new(gl, self.program.locations(), &self.uploader);
        let shapes = backgrounds
            .iter()
            .copied()
            .map(Shape::from)
            .chain(points.iter().copied().map(Shape::from));

        let mut stats = FrameStats::default();
        for (index, shape) in shapes.enumerate() {
            match drawer.draw(&shape) {
                Ok(()) => {
                    log::trace!("drew shape #{index}");
                    stats.drawn += 1;
                }
                Err(RenderError::MalformedShape { reason, .. }) => {
                    let err = RenderError::MalformedShape { index, reason };
                    log::warn!("skipping {err}");
                    stats.skipped += 1;
                }
                Err(e) => {
                    log::warn!("skipping shape #{index}: {e}");
                    stats.skipped += 1;
                }
            }
        }

        log::info!(
            "rendered frame {}x{}: {} drawn, {} skipped",
            surface.width(),
            surface.height(),
            stats.drawn,
            stats.skipped
        );
        stats
    }

    /// Renders a whole scene.
    pub fn render_scene(&self, gl: &B, surface: SurfaceSize, scene: &SceneData) -> FrameStats {
        self.render_frame(gl, surface, &scene.backgrounds, &scene.points)
    }

    /// Releases the program and both buffers.
    pub fn destroy(self, gl: &B) {
        self.program.destroy(gl);
        self.uploader.destroy(gl);
    }
}

/// Builds the pipeline and renders `scene` once.
///
/// This is the single entry point a host calls when its surface is ready.
///
/// # Errors
///
/// Returns any setup error; no shape is drawn in that case.
pub fn render_once<B: GraphicsBackend>(
    gl: &B,
    surface: SurfaceSize,
    scene: &SceneData,
) -> Result<FrameStats, RenderError> {
    let renderer = SceneRenderer::new(gl)?;
    Ok(renderer.render_scene(gl, surface, scene))
}
