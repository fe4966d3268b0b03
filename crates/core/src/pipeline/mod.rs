//! The rendering pipeline.
//!
//! # Module overview
//!
//! - [`backend`] -- The `GraphicsBackend` seam and its GL vocabulary enums.
//! - [`flat`] -- Flat-color vertex and fragment shader sources.
//! - [`shader`] -- Shader compilation, linking, and slot resolution.
//! - [`uploader`] -- Position and color vertex buffers.
//! - [`drawer`] -- Draws one shape as a 4-vertex triangle strip.
//! - [`renderer`] -- Per-frame sequence and the one-shot `render_once`.
//! - [`software`] -- CPU reference backend with a command log.
//! - `gl` -- `glow` backend (feature `gl`).

pub mod backend;
pub mod drawer;
pub mod flat;
#[cfg(feature = "gl")]
pub mod gl;
pub mod renderer;
pub mod shader;
pub mod software;
pub mod uploader;

pub use backend::{BufferUsage, DrawMode, GraphicsBackend, ShaderStage};
pub use drawer::ShapeDrawer;
pub use flat::{FLAT_FRAGMENT_SHADER, FLAT_VERTEX_SHADER};
#[cfg(feature = "gl")]
pub use gl::GlowBackend;
pub use renderer::{render_once, FrameStats, SceneRenderer, CLEAR_COLOR};
pub use shader::{
    compile_program, compile_shader, format_shader_error, link_program, ProgramLocations,
    ShaderError, ShaderProgram,
};
pub use software::{Framebuffer, SoftwareBackend};
pub use uploader::GeometryUploader;
