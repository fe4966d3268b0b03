//! A CPU reference implementation of [`GraphicsBackend`].
//!
//! `SoftwareBackend` keeps GL object semantics (handles, bind points,
//! attribute pointers, per-program uniforms) and records every
//! state-changing call in a command log that tests can inspect.
//!
//! Draws execute the flat-color program model: the linked program's
//! `vec2` attribute is a pixel-space position, its `vec2` uniform is the
//! surface resolution, and its `vec4` attribute is the vertex color.
//! Positions go through [`pixel_to_clip`] and the viewport, then
//! triangles are rasterized into an RGBA framebuffer with no blending
//! and no depth test.

pub mod glsl;
pub mod raster;

pub use self::raster::Framebuffer;

use std::cell::{Ref, RefCell};

use glam::Vec2;

use self::glsl::{LinkedInterface, StageInterface};
use self::raster::{Bounds, RasterVertex};
use super::backend::{BufferUsage, DrawMode, GraphicsBackend, ShaderStage};
use crate::color::Rgba;
use crate::error::RenderError;
use crate::geometry::pixel_to_clip;
use crate::surface::SurfaceSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(usize);

/// A uniform slot within one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformSlot {
    program: ProgramId,
    index: usize,
}

/// A recorded state-changing call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Viewport {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Clear {
        color: [f32; 4],
    },
    UseProgram(Option<ProgramId>),
    Uniform2f {
        location: UniformSlot,
        x: f32,
        y: f32,
    },
    BufferData {
        buffer: BufferId,
        data: Vec<f32>,
        usage: BufferUsage,
    },
    Draw {
        mode: DrawMode,
        first: i32,
        count: i32,
    },
}

struct ShaderObject {
    stage: ShaderStage,
    source: String,
    interface: Option<StageInterface>,
    log: String,
}

struct ProgramObject {
    attached: Vec<ShaderId>,
    linked: Option<LinkedInterface>,
    log: String,
    uniform_values: Vec<Option<[f32; 2]>>,
}

#[derive(Debug, Clone, Copy)]
struct AttribPointer {
    buffer: BufferId,
    size: usize,
    stride: usize,
    offset: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct AttribState {
    enabled: bool,
    pointer: Option<AttribPointer>,
}

struct State {
    framebuffer: Framebuffer,
    shaders: Vec<Option<ShaderObject>>,
    programs: Vec<Option<ProgramObject>>,
    programs_created: usize,
    buffers: Vec<Option<Vec<f32>>>,
    bound_array_buffer: Option<BufferId>,
    attribs: Vec<AttribState>,
    current_program: Option<ProgramId>,
    viewport: [i32; 4],
    clear_color: [f32; 4],
    commands: Vec<Command>,
    program_limit: Option<usize>,
    buffer_limit: Option<usize>,
}

/// CPU rasterization context bound to a fixed-size surface.
pub struct SoftwareBackend {
    size: SurfaceSize,
    state: RefCell<State>,
}

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

impl SoftwareBackend {
    pub fn new(size: SurfaceSize) -> Self {
        let state = State {
            framebuffer: Framebuffer::new(size),
            shaders: Vec::new(),
            programs: Vec::new(),
            programs_created: 0,
            buffers: Vec::new(),
            bound_array_buffer: None,
            attribs: Vec::new(),
            current_program: None,
            viewport: [0, 0, size.width() as i32, size.height() as i32],
            clear_color: [0.0; 4],
            commands: Vec::new(),
            program_limit: None,
            buffer_limit: None,
        };
        Self {
            size,
            state: RefCell::new(state),
        }
    }

    /// Acquires a context for a `width` x `height` surface.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UnsupportedSurface` if the size is not
    /// representable.
    pub fn with_size(width: u32, height: u32) -> Result<Self, RenderError> {
        let size = SurfaceSize::new(width, height).map_err(|e| {
            RenderError::UnsupportedSurface(format!("cannot allocate {width}x{height} surface: {e}"))
        })?;
        Ok(Self::new(size))
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn framebuffer(&self) -> Ref<'_, Framebuffer> {
        Ref::map(self.state.borrow(), |s| &s.framebuffer)
    }

    pub fn into_framebuffer(self) -> Framebuffer {
        self.state.into_inner().framebuffer
    }

    /// A copy of the command log.
    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    /// Drains the command log.
    pub fn take_commands(&self) -> Vec<Command> {
        std::mem::take(&mut self.state.borrow_mut().commands)
    }

    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    /// `(mode, first, count)` of every recorded draw, in order.
    pub fn draw_calls(&self) -> Vec<(DrawMode, i32, i32)> {
        self.state
            .borrow()
            .commands
            .iter()
            .filter_map(|c| match *c {
                Command::Draw { mode, first, count } => Some((mode, first, count)),
                _ => None,
            })
            .collect()
    }

    /// Current content of `buffer`; empty if it was never written or has
    /// been deleted.
    pub fn buffer_contents(&self, buffer: BufferId) -> Vec<f32> {
        self.state
            .borrow()
            .buffers
            .get(buffer.0)
            .and_then(|b| b.clone())
            .unwrap_or_default()
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.iter().flatten().count()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.iter().flatten().count()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.iter().flatten().count()
    }

    /// Number of `create_program` calls that succeeded, including
    /// programs since deleted.
    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    /// Makes `create_program` fail while `max_live` programs exist.
    pub fn limit_programs(&self, max_live: usize) {
        self.state.borrow_mut().program_limit = Some(max_live);
    }

    /// Makes `create_buffer` fail while `max_live` buffers exist.
    pub fn limit_buffers(&self, max_live: usize) {
        self.state.borrow_mut().buffer_limit = Some(max_live);
    }
}

impl State {
    fn shader(&self, id: ShaderId) -> Option<&ShaderObject> {
        self.shaders.get(id.0).and_then(Option::as_ref)
    }

    fn program(&self, id: ProgramId) -> Option<&ProgramObject> {
        self.programs.get(id.0).and_then(Option::as_ref)
    }

    fn program_mut(&mut self, id: ProgramId) -> Option<&mut ProgramObject> {
        self.programs.get_mut(id.0).and_then(Option::as_mut)
    }

    fn attrib_mut(&mut self, index: u32) -> &mut AttribState {
        let index = index as usize;
        if self.attribs.len() <= index {
            self.attribs.resize(index + 1, AttribState::default());
        }
        &mut self.attribs[index]
    }

    fn link(&self, program: &ProgramObject) -> Result<LinkedInterface, String> {
        let mut vertex = None;
        let mut fragment = None;
        for &id in &program.attached {
            let shader = self
                .shader(id)
                .ok_or_else(|| format!("attached shader {id:?} was deleted"))?;
            let interface = shader
                .interface
                .as_ref()
                .ok_or_else(|| format!("{} shader is not compiled", shader.stage))?;
            match shader.stage {
                ShaderStage::Vertex => vertex = Some(interface),
                ShaderStage::Fragment => fragment = Some(interface),
            }
        }
        let vertex = vertex.ok_or("missing vertex shader")?;
        let fragment = fragment.ok_or("missing fragment shader")?;
        glsl::link(vertex, fragment)
    }

    /// Reads `count` vertices of attribute `location`, filling missing
    /// components with (0, 0, 0, 1).
    fn fetch(&self, location: usize, first: usize, count: usize) -> Result<Vec<[f32; 4]>, String> {
        let attrib = self
            .attribs
            .get(location)
            .copied()
            .unwrap_or_default();
        if !attrib.enabled {
            return Err(format!("attribute {location} is not enabled"));
        }
        let pointer = attrib
            .pointer
            .ok_or_else(|| format!("attribute {location} has no buffer"))?;
        let data = self
            .buffers
            .get(pointer.buffer.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| format!("attribute {location} points at a deleted buffer"))?;
        let stride = if pointer.stride == 0 {
            pointer.size * FLOAT_BYTES
        } else {
            pointer.stride
        };

        (first..first + count)
            .map(|vertex| {
                let start = (pointer.offset + vertex * stride) / FLOAT_BYTES;
                let values = data.get(start..start + pointer.size).ok_or_else(|| {
                    format!("attribute {location} reads past the end of its buffer at vertex {vertex}")
                })?;
                let mut out = [0.0, 0.0, 0.0, 1.0];
                out[..values.len().min(4)].copy_from_slice(&values[..values.len().min(4)]);
                Ok(out)
            })
            .collect()
    }

    fn execute_draw(&mut self, mode: DrawMode, first: usize, count: usize) -> Result<usize, String> {
        let program_id = self.current_program.ok_or("no program in use")?;
        let program = self
            .program(program_id)
            .ok_or("current program was deleted")?;
        let linked = program.linked.as_ref().ok_or("current program is not linked")?;

        let attribute = |ty: &str| {
            linked
                .attributes
                .iter()
                .position(|v| v.ty == ty)
                .ok_or_else(|| format!("program has no {ty} attribute"))
        };
        let position_loc = attribute("vec2")?;
        let color_loc = attribute("vec4")?;
        let resolution_index = linked
            .uniforms
            .iter()
            .position(|u| u.ty == "vec2")
            .ok_or("program has no vec2 uniform")?;
        let [rw, rh] = program
            .uniform_values
            .get(resolution_index)
            .copied()
            .flatten()
            .ok_or("resolution uniform was never set")?;
        let resolution = Vec2::new(rw, rh);

        let positions = self.fetch(position_loc, first, count)?;
        let colors = self.fetch(color_loc, first, count)?;

        let [vx, vy, vw, vh] = self.viewport.map(|v| v as f32);
        let vertices: Vec<RasterVertex> = positions
            .iter()
            .zip(&colors)
            .map(|(p, c)| {
                let clip = pixel_to_clip(Vec2::new(p[0], p[1]), resolution);
                RasterVertex {
                    position: Vec2::new((clip.x + 1.0) * 0.5 * vw + vx, (clip.y + 1.0) * 0.5 * vh + vy),
                    color: Rgba::from(*c),
                }
            })
            .collect();

        let triangles: Vec<[RasterVertex; 3]> = match mode {
            DrawMode::TriangleStrip => vertices.windows(3).map(|w| [w[0], w[1], w[2]]).collect(),
            DrawMode::Triangles => vertices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
        };

        let [x, y, w, h] = self.viewport;
        let clip = Bounds {
            x0: x as i64,
            y0: y as i64,
            x1: x as i64 + w as i64,
            y1: y as i64 + h as i64,
        };
        Ok(triangles
            .into_iter()
            .map(|tri| self.framebuffer.fill_triangle(tri, clip))
            .sum())
    }
}

impl GraphicsBackend for SoftwareBackend {
    type Shader = ShaderId;
    type Program = ProgramId;
    type Buffer = BufferId;
    type UniformLocation = UniformSlot;

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderId, String> {
        let mut state = self.state.borrow_mut();
        state.shaders.push(Some(ShaderObject {
            stage,
            source: String::new(),
            interface: None,
            log: String::new(),
        }));
        Ok(ShaderId(state.shaders.len() - 1))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(shader.0).and_then(Option::as_mut) {
            Some(obj) => obj.source = source.to_string(),
            None => log::warn!("shader_source on invalid shader {shader:?}"),
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        let Some(obj) = state.shaders.get_mut(shader.0).and_then(Option::as_mut) else {
            log::warn!("compile_shader on invalid shader {shader:?}");
            return;
        };
        match glsl::scan(obj.stage, &obj.source) {
            Ok(interface) => {
                obj.interface = Some(interface);
                obj.log.clear();
            }
            Err(e) => {
                obj.interface = None;
                obj.log = e.to_string();
            }
        }
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state
            .borrow()
            .shader(shader)
            .is_some_and(|s| s.interface.is_some())
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        self.state
            .borrow()
            .shader(shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderId) {
        if let Some(slot) = self.state.borrow_mut().shaders.get_mut(shader.0) {
            *slot = None;
        }
    }

    fn create_program(&self) -> Result<ProgramId, String> {
        let mut state = self.state.borrow_mut();
        let live = state.programs.iter().flatten().count();
        if state.program_limit.is_some_and(|max| live >= max) {
            return Err(format!("out of memory: {live} programs live"));
        }
        state.programs.push(Some(ProgramObject {
            attached: Vec::new(),
            linked: None,
            log: String::new(),
            uniform_values: Vec::new(),
        }));
        state.programs_created += 1;
        Ok(ProgramId(state.programs.len() - 1))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        match state.program_mut(program) {
            Some(p) if !p.attached.contains(&shader) => p.attached.push(shader),
            Some(_) => {}
            None => log::warn!("attach_shader on invalid program {program:?}"),
        }
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        if let Some(p) = self.state.borrow_mut().program_mut(program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        let result = match state.program(program) {
            Some(p) => state.link(p),
            None => {
                log::warn!("link_program on invalid program {program:?}");
                return;
            }
        };
        if let Some(p) = state.program_mut(program) {
            match result {
                Ok(linked) => {
                    p.uniform_values = vec![None; linked.uniforms.len()];
                    p.linked = Some(linked);
                    p.log.clear();
                }
                Err(e) => {
                    p.linked = None;
                    p.log = format!("ERROR: Linking failed: {e}");
                }
            }
        }
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .program(program)
            .is_some_and(|p| p.linked.is_some())
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.state
            .borrow()
            .program(program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.programs.get_mut(program.0) {
            *slot = None;
        }
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<ProgramId>) {
        let mut state = self.state.borrow_mut();
        state.current_program = program;
        state.commands.push(Command::UseProgram(program));
    }

    fn attrib_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let linked = state.program(program)?.linked.as_ref()?;
        linked
            .attributes
            .iter()
            .position(|v| v.name == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformSlot> {
        let state = self.state.borrow();
        let linked = state.program(program)?.linked.as_ref()?;
        let index = linked.uniforms.iter().position(|u| u.name == name)?;
        Some(UniformSlot { program, index })
    }

    fn uniform_2_f32(&self, location: &UniformSlot, x: f32, y: f32) {
        let mut state = self.state.borrow_mut();
        if state.current_program != Some(location.program) {
            log::warn!("uniform_2_f32 for {location:?} while another program is in use");
            return;
        }
        let Some(slot) = state
            .program_mut(location.program)
            .and_then(|p| p.uniform_values.get_mut(location.index))
        else {
            log::warn!("uniform_2_f32 on invalid location {location:?}");
            return;
        };
        *slot = Some([x, y]);
        state.commands.push(Command::Uniform2f {
            location: *location,
            x,
            y,
        });
    }

    fn create_buffer(&self) -> Result<BufferId, String> {
        let mut state = self.state.borrow_mut();
        let live = state.buffers.iter().flatten().count();
        if state.buffer_limit.is_some_and(|max| live >= max) {
            return Err(format!("out of memory: {live} buffers live"));
        }
        state.buffers.push(Some(Vec::new()));
        Ok(BufferId(state.buffers.len() - 1))
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.buffers.get_mut(buffer.0) {
            *slot = None;
        }
        if state.bound_array_buffer == Some(buffer) {
            state.bound_array_buffer = None;
        }
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        self.state.borrow_mut().bound_array_buffer = buffer;
    }

    fn array_buffer_data(&self, data: &[f32], usage: BufferUsage) {
        let mut state = self.state.borrow_mut();
        let Some(buffer) = state.bound_array_buffer else {
            log::warn!("array_buffer_data with no buffer bound");
            return;
        };
        let Some(slot) = state.buffers.get_mut(buffer.0).and_then(Option::as_mut) else {
            log::warn!("array_buffer_data on deleted buffer {buffer:?}");
            return;
        };
        *slot = data.to_vec();
        state.commands.push(Command::BufferData {
            buffer,
            data: data.to_vec(),
            usage,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state.borrow_mut().attrib_mut(index).enabled = true;
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        let mut state = self.state.borrow_mut();
        let Some(buffer) = state.bound_array_buffer else {
            log::warn!("vertex_attrib_pointer_f32 with no buffer bound");
            return;
        };
        let (Ok(size), Ok(stride), Ok(offset)) = (
            usize::try_from(size),
            usize::try_from(stride),
            usize::try_from(offset),
        ) else {
            log::warn!("vertex_attrib_pointer_f32 with negative argument");
            return;
        };
        if !(1..=4).contains(&size) {
            log::warn!("vertex_attrib_pointer_f32 with size {size}");
            return;
        }
        state.attrib_mut(index).pointer = Some(AttribPointer {
            buffer,
            size,
            stride,
            offset,
        });
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        state.viewport = [x, y, width, height];
        state.commands.push(Command::Viewport {
            x,
            y,
            width,
            height,
        });
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state.borrow_mut().clear_color = [r, g, b, a];
    }

    fn clear_color_buffer(&self) {
        let mut state = self.state.borrow_mut();
        let color = state.clear_color;
        state.framebuffer.fill(Rgba::from(color));
        state.commands.push(Command::Clear { color });
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        let mut state = self.state.borrow_mut();
        state.commands.push(Command::Draw { mode, first, count });
        let (Ok(first), Ok(count)) = (usize::try_from(first), usize::try_from(count)) else {
            log::warn!("draw_arrays with negative range");
            return;
        };
        match state.execute_draw(mode, first, count) {
            Ok(pixels) => log::trace!("{mode:?} draw of {count} vertices wrote {pixels} pixels"),
            Err(e) => log::warn!("draw_arrays skipped: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::flat::{FLAT_FRAGMENT_SHADER, FLAT_VERTEX_SHADER};
    use crate::pipeline::shader::compile_program;

    fn flat_program(gl: &SoftwareBackend) -> ProgramId {
        compile_program(gl, FLAT_VERTEX_SHADER, FLAT_FRAGMENT_SHADER).unwrap()
    }

    #[test]
    fn with_size_rejects_empty_surface() {
        let err = SoftwareBackend::with_size(0, 10).err().unwrap();
        assert!(matches!(err, RenderError::UnsupportedSurface(_)), "got: {err}");
    }

    #[test]
    fn compile_log_is_empty_on_success() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let shader = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(shader, FLAT_VERTEX_SHADER);
        gl.compile_shader(shader);
        assert!(gl.shader_compile_status(shader));
        assert!(gl.shader_info_log(shader).is_empty());
    }

    #[test]
    fn link_without_fragment_stage_fails() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let shader = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(shader, FLAT_VERTEX_SHADER);
        gl.compile_shader(shader);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, shader);
        gl.link_program(program);
        assert!(!gl.program_link_status(program));
        assert!(gl.program_info_log(program).contains("fragment"));
    }

    #[test]
    fn uniform_locations_are_per_program() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let a = flat_program(&gl);
        let b = flat_program(&gl);
        let loc_b = gl.uniform_location(b, "u_resolution").unwrap();
        gl.use_program(Some(a));
        gl.uniform_2_f32(&loc_b, 1.0, 1.0);
        assert!(
            !gl.commands().iter().any(|c| matches!(c, Command::Uniform2f { .. })),
            "uniform for an inactive program must be ignored"
        );
    }

    #[test]
    fn unknown_names_have_no_location() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let program = flat_program(&gl);
        assert_eq!(gl.attrib_location(program, "a_missing"), None);
        assert!(gl.uniform_location(program, "u_missing").is_none());
    }

    #[test]
    fn draw_without_enabled_attributes_writes_nothing() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let program = flat_program(&gl);
        gl.use_program(Some(program));
        let loc = gl.uniform_location(program, "u_resolution").unwrap();
        gl.uniform_2_f32(&loc, 4.0, 4.0);
        gl.draw_arrays(DrawMode::TriangleStrip, 0, 4);
        assert_eq!(gl.draw_calls().len(), 1, "the call is still recorded");
        assert!(gl.framebuffer().pixels().iter().all(|p| p.a == 0.0));
    }

    #[test]
    fn triangles_mode_with_viewport_offset() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let program = flat_program(&gl);
        gl.use_program(Some(program));
        let loc = gl.uniform_location(program, "u_resolution").unwrap();
        gl.uniform_2_f32(&loc, 2.0, 2.0);
        // The program sees a 2x2 surface mapped onto the bottom-left quarter.
        gl.viewport(0, 0, 2, 2);

        let positions = gl.create_buffer().unwrap();
        gl.bind_array_buffer(Some(positions));
        gl.array_buffer_data(&[0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0], BufferUsage::StaticDraw);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, 0, 0);

        let colors = gl.create_buffer().unwrap();
        gl.bind_array_buffer(Some(colors));
        gl.array_buffer_data(&[1.0_f32, 0.0, 0.0, 1.0].repeat(6), BufferUsage::StaticDraw);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, 0, 0);

        gl.draw_arrays(DrawMode::Triangles, 0, 6);

        let fb = gl.framebuffer();
        assert_eq!(fb.pixel(0, 3), Some(Rgba::RED));
        assert_eq!(fb.pixel(1, 2), Some(Rgba::RED));
        assert_eq!(fb.pixel(3, 0).map(|c| c.a), Some(0.0));
    }

    #[test]
    fn deleted_buffer_reads_empty() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        let buffer = gl.create_buffer().unwrap();
        gl.bind_array_buffer(Some(buffer));
        gl.array_buffer_data(&[1.0, 2.0], BufferUsage::DynamicDraw);
        gl.delete_buffer(buffer);
        assert!(gl.buffer_contents(buffer).is_empty());
        assert_eq!(gl.live_buffers(), 0);
    }

    #[test]
    fn buffer_limit_counts_live_buffers_only() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        gl.limit_buffers(1);
        let first = gl.create_buffer().unwrap();
        assert!(gl.create_buffer().unwrap_err().contains("out of memory"));
        gl.delete_buffer(first);
        assert!(gl.create_buffer().is_ok());
    }

    #[test]
    fn program_limit_rejects_creation() {
        let gl = SoftwareBackend::with_size(4, 4).unwrap();
        gl.limit_programs(0);
        assert!(gl.create_program().is_err());
        assert_eq!(gl.programs_created(), 0);
    }
}
