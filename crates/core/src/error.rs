//! Error types for the bandplot core.

use thiserror::Error;

use crate::pipeline::shader::ShaderError;

/// Errors produced while acquiring a surface, building the pipeline or
/// rendering a frame.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// The surface provider could not produce a rasterization context.
    #[error("unsupported surface: {0}")]
    UnsupportedSurface(String),

    /// Width or height was zero, or the surface exceeds the size caps.
    #[error("invalid dimensions: width and height must be non-zero and within surface limits")]
    InvalidDimensions,

    /// Shader compilation, linking or location lookup failed.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// The context refused to allocate a buffer or program object.
    #[error("resource allocation failed: {0}")]
    Resource(String),

    /// A shape descriptor did not resolve to a valid quad.
    #[error("malformed shape #{index}: {reason}")]
    MalformedShape { index: usize, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing a snapshot failed.
    #[error("I/O error: {0}")]
    Io(String),
}
