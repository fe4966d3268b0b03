//! Shader compilation, linking and slot lookup.
//!
//! Compile and link failures release the partially built object, log the
//! driver's diagnostic and return an error; nothing downstream ever sees
//! a half-built handle. [`ShaderProgram`] bundles a linked program with
//! its resolved attribute and uniform slots.

use glam::Vec2;
use thiserror::Error;

use super::backend::{GraphicsBackend, ShaderStage};
use super::flat::{
    COLOR_ATTRIBUTE, FLAT_FRAGMENT_SHADER, FLAT_VERTEX_SHADER, POSITION_ATTRIBUTE,
    RESOLUTION_UNIFORM,
};

/// Errors that can occur while building a shader program.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The shader stage that failed (e.g. "vertex", "fragment").
        stage: String,
        /// The driver's info log, with the numbered source prepended.
        log: String,
    },
    /// A program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
    /// A named attribute or uniform is not active in the linked program.
    #[error("shader slot not found: {0}")]
    MissingLocation(String),
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. Both may be empty.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered: String = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` if the stage cannot be created or
/// fails to compile. The stage object is deleted before returning.
pub fn compile_shader<B: GraphicsBackend>(
    gl: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|e| ShaderError::CompileError {
            stage: stage.to_string(),
            log: e,
        })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.shader_compile_status(shader) {
        log::debug!("compiled {stage} shader");
        return Ok(shader);
    }

    let info_log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    let err = ShaderError::CompileError {
        stage: stage.to_string(),
        log: format_shader_error(source, &info_log),
    };
    log::error!("{err}");
    Err(err)
}

/// Links a vertex and fragment stage into a program.
///
/// Both stages are detached after linking whether or not it succeeded.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if linking fails. The program object
/// is deleted before returning.
pub fn link_program<B: GraphicsBackend>(
    gl: &B,
    vertex: B::Shader,
    fragment: B::Shader,
) -> Result<B::Program, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::LinkError)?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    if gl.program_link_status(program) {
        return Ok(program);
    }

    let info_log = gl.program_info_log(program);
    gl.delete_program(program);
    let err = ShaderError::LinkError(info_log);
    log::error!("{err}");
    Err(err)
}

/// Compiles both stages and links them.
///
/// A stage that fails to compile short-circuits: the other stage is
/// released and no program object is created. Stage objects are deleted
/// after linking regardless of the outcome.
///
/// # Errors
///
/// Returns the first `CompileError`, or a `LinkError`.
pub fn compile_program<B: GraphicsBackend>(
    gl: &B,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<B::Program, ShaderError> {
    let vert = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vert);
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    gl.delete_shader(vert);
    gl.delete_shader(frag);

    result
}

/// Resolved slots of the flat-color program.
#[derive(Debug, Clone)]
pub struct ProgramLocations<U> {
    /// `a_position`, two floats per vertex.
    pub position: u32,
    /// `a_color`, four floats per vertex.
    pub color: u32,
    /// `u_resolution`, surface width and height in pixels.
    pub resolution: U,
}

/// Looks up the flat-color slots by name.
///
/// # Errors
///
/// Returns `ShaderError::MissingLocation` naming the first slot that is
/// not active in `program`.
pub fn resolve_locations<B: GraphicsBackend>(
    gl: &B,
    program: B::Program,
) -> Result<ProgramLocations<B::UniformLocation>, ShaderError> {
    let attrib = |name: &str| {
        gl.attrib_location(program, name)
            .ok_or_else(|| ShaderError::MissingLocation(name.to_string()))
    };
    let position = attrib(POSITION_ATTRIBUTE)?;
    let color = attrib(COLOR_ATTRIBUTE)?;
    let resolution = gl
        .uniform_location(program, RESOLUTION_UNIFORM)
        .ok_or_else(|| ShaderError::MissingLocation(RESOLUTION_UNIFORM.to_string()))?;

    Ok(ProgramLocations {
        position,
        color,
        resolution,
    })
}

/// A linked program together with its resolved slots.
///
/// Only constructible from a program that compiled, linked and exposes
/// every slot, so holding one means the pipeline is usable.
pub struct ShaderProgram<B: GraphicsBackend> {
    program: B::Program,
    locations: ProgramLocations<B::UniformLocation>,
}

impl<B: GraphicsBackend> ShaderProgram<B> {
    /// Builds a program from custom sources that expose the flat-color
    /// slot names.
    ///
    /// # Errors
    ///
    /// Returns any compile, link or slot lookup error. A program that
    /// linked but lacks a slot is deleted.
    pub fn new(gl: &B, vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let program = compile_program(gl, vertex_src, fragment_src)?;
        match resolve_locations(gl, program) {
            Ok(locations) => Ok(Self { program, locations }),
            Err(e) => {
                log::error!("{e}");
                gl.delete_program(program);
                Err(e)
            }
        }
    }

    /// Builds the built-in flat-color program.
    pub fn flat(gl: &B) -> Result<Self, ShaderError> {
        Self::new(gl, FLAT_VERTEX_SHADER, FLAT_FRAGMENT_SHADER)
    }

    pub fn program(&self) -> B::Program {
        self.program
    }

    pub fn locations(&self) -> &ProgramLocations<B::UniformLocation> {
        &self.locations
    }

    /// Makes this the active program.
    pub fn activate(&self, gl: &B) {
        gl.use_program(Some(self.program));
    }

    /// Sets `u_resolution`. The program must be active.
    pub fn set_resolution(&self, gl: &B, resolution: Vec2) {
        gl.uniform_2_f32(&self.locations.resolution, resolution.x, resolution.y);
    }

    /// Deletes the program object.
    pub fn destroy(self, gl: &B) {
        gl.delete_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::software::SoftwareBackend;
    use crate::surface::SurfaceSize;

    fn backend() -> SoftwareBackend {
        SoftwareBackend::new(SurfaceSize::new(8, 8).unwrap())
    }

    // --- format_shader_error tests ---

    #[test]
    fn format_shader_error_prepends_line_numbers() {
        let source = "#version 300 es\nvoid main() {\n}\n";
        let log = "ERROR: 0:2: syntax error";
        let formatted = format_shader_error(source, log);

        assert!(formatted.contains("1: #version 300 es"), "got:\n{formatted}");
        assert!(formatted.contains("2: void main() {"), "got:\n{formatted}");
        assert!(formatted.contains("3: }"), "got:\n{formatted}");
        assert!(formatted.ends_with(log), "got:\n{formatted}");
    }

    #[test]
    fn format_shader_error_handles_empty_inputs() {
        assert_eq!(format_shader_error("", "some error"), "some error");
        assert_eq!(format_shader_error("void main() {}", ""), "1: void main() {}");
        assert!(format_shader_error("", "").is_empty());
    }

    #[test]
    fn format_shader_error_right_aligns_line_numbers() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let formatted = format_shader_error(&source, "err");
        let lines: Vec<&str> = formatted.lines().collect();

        assert!(lines[0].starts_with(" 1: "), "got: '{}'", lines[0]);
        assert!(lines[9].starts_with("10: "), "got: '{}'", lines[9]);
    }

    // --- ShaderError Display tests ---

    #[test]
    fn shader_compile_error_display_includes_stage_and_log() {
        let err = ShaderError::CompileError {
            stage: "fragment".into(),
            log: "undeclared identifier".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("fragment"), "missing stage in: {msg}");
        assert!(msg.contains("undeclared identifier"), "missing log in: {msg}");
    }

    #[test]
    fn missing_location_display_names_slot() {
        let msg = ShaderError::MissingLocation("a_color".into()).to_string();
        assert!(msg.contains("a_color"), "got: {msg}");
    }

    // --- pipeline behaviour against the software context ---

    #[test]
    fn compile_shader_accepts_flat_stages() {
        let gl = backend();
        assert!(compile_shader(&gl, ShaderStage::Vertex, FLAT_VERTEX_SHADER).is_ok());
        assert!(compile_shader(&gl, ShaderStage::Fragment, FLAT_FRAGMENT_SHADER).is_ok());
        assert_eq!(gl.live_shaders(), 2);
    }

    #[test]
    fn compile_shader_failure_returns_error_and_releases_stage() {
        let gl = backend();
        let result = compile_shader(&gl, ShaderStage::Vertex, "void main( {");
        match result {
            Err(ShaderError::CompileError { stage, log }) => {
                assert_eq!(stage, "vertex");
                assert!(log.contains("1: void main( {"), "numbered source missing:\n{log}");
            }
            other => panic!("expected CompileError, got {other:?}"),
        }
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn compile_program_stops_before_linking_on_bad_stage() {
        let gl = backend();
        let result = compile_program(&gl, FLAT_VERTEX_SHADER, "void main() { oops");
        assert!(matches!(result, Err(ShaderError::CompileError { ref stage, .. }) if stage == "fragment"));
        assert_eq!(gl.programs_created(), 0, "no program may be created");
        assert_eq!(gl.live_shaders(), 0, "vertex stage must be released");
    }

    #[test]
    fn compile_program_releases_stages_after_link() {
        let gl = backend();
        let program = compile_program(&gl, FLAT_VERTEX_SHADER, FLAT_FRAGMENT_SHADER);
        assert!(program.is_ok());
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn link_failure_returns_error_and_releases_program() {
        let gl = backend();
        let fragment = "#version 300 es\nin vec4 v_missing;\nout vec4 c;\nvoid main() { c = v_missing; }\n";
        let result = compile_program(&gl, FLAT_VERTEX_SHADER, fragment);
        match result {
            Err(ShaderError::LinkError(log)) => {
                assert!(log.contains("v_missing"), "got: {log}");
            }
            other => panic!("expected LinkError, got {other:?}"),
        }
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn resolve_locations_finds_flat_slots() {
        let gl = backend();
        let program = compile_program(&gl, FLAT_VERTEX_SHADER, FLAT_FRAGMENT_SHADER).unwrap();
        let locations = resolve_locations(&gl, program).unwrap();
        assert_eq!(locations.position, 0);
        assert_eq!(locations.color, 1);
    }

    #[test]
    fn shader_program_rejects_sources_without_color_slot() {
        let gl = backend();
        let vertex = "#version 300 es\nin vec2 a_position;\nuniform vec2 u_resolution;\nvoid main() { gl_Position = vec4(a_position / u_resolution, 0.0, 1.0); }\n";
        let fragment = "#version 300 es\nprecision mediump float;\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n";
        let result = ShaderProgram::new(&gl, vertex, fragment);
        assert!(matches!(result, Err(ShaderError::MissingLocation(ref n)) if n == COLOR_ATTRIBUTE));
        assert_eq!(gl.live_programs(), 0, "program lacking slots must be released");
    }

    #[test]
    fn shader_program_destroy_releases_program() {
        let gl = backend();
        let program = ShaderProgram::flat(&gl).unwrap();
        assert_eq!(gl.live_programs(), 1);
        program.destroy(&gl);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn shader_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ShaderError>();
    }
}
