//! The flat-color shading program: pixel-space positions, per-vertex
//! colors, no lighting or texturing.
//!
//! The vertex stage converts pixel coordinates (origin top-left, Y down)
//! to clip space using the surface resolution, flipping Y. The fragment
//! stage writes the interpolated vertex color.

/// Name of the `vec2` pixel-space position attribute.
pub const POSITION_ATTRIBUTE: &str = "a_position";
/// Name of the `vec4` per-vertex color attribute.
pub const COLOR_ATTRIBUTE: &str = "a_color";
/// Name of the `vec2` surface resolution uniform, in pixels.
pub const RESOLUTION_UNIFORM: &str = "u_resolution";

/// GLSL ES 3.0 vertex stage.
pub const FLAT_VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
in vec4 a_color;
uniform vec2 u_resolution;
out vec4 v_color;

void main() {
    vec2 zeroToOne = a_position / u_resolution;
    vec2 zeroToTwo = zeroToOne * 2.0;
    vec2 clipSpace = zeroToTwo - 1.0;
    gl_Position = vec4(clipSpace * vec2(1.0, -1.0), 0.0, 1.0);
    v_color = a_color;
}
"#;

/// GLSL ES 3.0 fragment stage.
pub const FLAT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec4 v_color;
out vec4 fragColor;

void main() {
    fragColor = v_color;
}
"#;
