//! `glow` implementation of [`GraphicsBackend`].
//!
//! `GlowBackend` wraps a `glow::Context` and a vertex array object that
//! stays bound for its lifetime, as WebGL2 and core-profile GL require
//! one for attribute state. Every trait method forwards to the matching
//! GL call.

use glow::HasContext;

use super::backend::{BufferUsage, DrawMode, GraphicsBackend, ShaderStage};

/// Wraps a `glow::Context` with the vertex array the pipeline draws with.
pub struct GlowBackend {
    gl: glow::Context,
    vao: glow::VertexArray,
}

impl GlowBackend {
    /// Wraps `gl` and binds a fresh vertex array object.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex array cannot be created.
    #[allow(unsafe_code)]
    pub fn new(gl: glow::Context) -> Result<Self, String> {
        // SAFETY: glow wraps raw GL calls as unsafe. The VAO handle comes
        // from this context and is bound before any attribute setup.
        let vao = unsafe { gl.create_vertex_array()? };
        unsafe { gl.bind_vertex_array(Some(vao)) };
        log::debug!("GL backend ready: {}", gl_version(&gl));
        Ok(Self { gl, vao })
    }

    /// Returns a reference to the underlying `glow::Context`.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Releases the vertex array and returns the underlying `glow::Context`.
    #[allow(unsafe_code)]
    pub fn into_gl(self) -> glow::Context {
        // SAFETY: self.vao was created on self.gl in new().
        unsafe {
            self.gl.bind_vertex_array(None);
            self.gl.delete_vertex_array(self.vao);
        }
        self.gl
    }
}

#[allow(unsafe_code)]
fn gl_version(gl: &glow::Context) -> String {
    // SAFETY: VERSION is a valid string parameter on every GL/WebGL2 context.
    unsafe { gl.get_parameter_string(glow::VERSION) }
}

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn usage_enum(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
    }
}

fn mode_enum(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Triangles => glow::TRIANGLES,
        DrawMode::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

// SAFETY (applies to every method below): glow marks all GL entry points
// unsafe. Handles passed in were created on this same context, and enum
// arguments come from the fixed mappings above.
#[allow(unsafe_code)]
impl GraphicsBackend for GlowBackend {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<glow::Shader, String> {
        unsafe { self.gl.create_shader(stage_enum(stage)) }
    }

    fn shader_source(&self, shader: glow::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_2_f32(&self, location: &glow::UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(Some(location), x, y) }
    }

    fn create_buffer(&self) -> Result<glow::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&self, buffer: glow::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn bind_array_buffer(&self, buffer: Option<glow::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe {
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, usage_enum(usage))
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset)
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode_enum(mode), first, count) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_enums_match_gl() {
        assert_eq!(stage_enum(ShaderStage::Vertex), glow::VERTEX_SHADER);
        assert_eq!(stage_enum(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn geometry_uploads_use_dynamic_draw_enum() {
        assert_eq!(usage_enum(BufferUsage::DynamicDraw), glow::DYNAMIC_DRAW);
        assert_eq!(usage_enum(BufferUsage::StaticDraw), glow::STATIC_DRAW);
    }

    #[test]
    fn shapes_draw_as_triangle_strips() {
        assert_eq!(mode_enum(DrawMode::TriangleStrip), glow::TRIANGLE_STRIP);
        assert_eq!(mode_enum(DrawMode::Triangles), glow::TRIANGLES);
    }

    #[test]
    fn glow_backend_struct_compiles_with_expected_api() {
        // Compile-time check that the public API exists.
        fn _assert_api(backend: &GlowBackend) {
            let _gl: &glow::Context = backend.gl();
        }
        fn _assert_backend<B: GraphicsBackend>() {}
        _assert_backend::<GlowBackend>();
    }

    #[test]
    #[ignore = "requires GL context"]
    fn render_once_draws_reference_scene() {
        // Would test: render_once(&GlowBackend::new(gl)?, size, &SceneData::reference())
        // returns FrameStats { drawn: 8, skipped: 0 }.
    }
}
