#![deny(unsafe_code)]
//! Core pipeline for bandplot: draws flat-colored axis-aligned quads
//! (background bands and square point markers) through a GL-style
//! graphics backend.
//!
//! Provides the `GraphicsBackend` seam, the flat-color shader program,
//! vertex uploads, shape drawing, per-frame scene rendering, the
//! software reference backend, and the scene data model (`Rgba`,
//! `Background`, `PointMarker`, `SceneData`, `SurfaceSize`).

pub mod color;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod scene;
#[cfg(feature = "png")]
pub mod snapshot;
pub mod surface;

pub use color::Rgba;
pub use error::RenderError;
pub use geometry::{pixel_to_clip, QuadGeometry};
pub use pipeline::{
    render_once, FrameStats, Framebuffer, GraphicsBackend, SceneRenderer, ShaderError,
    SoftwareBackend,
};
#[cfg(feature = "gl")]
pub use pipeline::GlowBackend;
pub use scene::{Background, PointMarker, SceneData, Shape};
pub use surface::SurfaceSize;
