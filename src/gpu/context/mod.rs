// Rendering Context
// The seam between sketch code and the graphics API.
// Main responsibilities:
// - Describe the context operations the sketches rely on (GlContext)
// - Pass those operations straight through to WebGL2 in the browser
// - Size a canvas element and acquire its webgl2 context

use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

use crate::error::SketchError;

/// Pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Primitive topology for `draw_arrays`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    pub fn gl_enum(self) -> u32 {
        match self {
            DrawMode::Points => GL::POINTS,
            DrawMode::Lines => GL::LINES,
            DrawMode::LineStrip => GL::LINE_STRIP,
            DrawMode::LineLoop => GL::LINE_LOOP,
            DrawMode::Triangles => GL::TRIANGLES,
            DrawMode::TriangleStrip => GL::TRIANGLE_STRIP,
            DrawMode::TriangleFan => GL::TRIANGLE_FAN,
        }
    }
}

/// Error codes reported through [`GlContext::error`].
pub const INVALID_VALUE: u32 = GL::INVALID_VALUE;
pub const INVALID_OPERATION: u32 = GL::INVALID_OPERATION;

/// A live graphics context that objects are created on and commands are issued to.
///
/// Every method is synchronous. Implementations are used from a single thread and
/// are never re-entered, so they take `&self` the same way the browser API does.
pub trait GlContext {
    type Shader;
    type Program;
    type Buffer;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn shader_compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> String;
    fn delete_shader(&self, shader: &Self::Shader);

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn program_link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> String;
    fn delete_program(&self, program: &Self::Program);

    fn use_program(&self, program: Option<&Self::Program>);
    fn attrib_location(&self, program: &Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn uniform_1f(&self, location: Option<&Self::UniformLocation>, value: f32);
    fn uniform_2f(&self, location: Option<&Self::UniformLocation>, value: [f32; 2]);
    fn uniform_4f(&self, location: Option<&Self::UniformLocation>, value: [f32; 4]);

    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn delete_buffer(&self, buffer: &Self::Buffer);
    fn bind_array_buffer(&self, buffer: Option<&Self::Buffer>);
    /// Uploads `data` into the currently bound array buffer (static usage).
    fn array_buffer_data(&self, data: &[f32]);
    /// Points attribute `index` at tightly packed `size`-component floats.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, rgba: [f32; 4]);
    fn clear_color_buffer(&self);
    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32);

    /// Returns and clears the pending error flag. `None` means no error.
    fn error(&self) -> Option<u32>;
}

impl GlContext for GL {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        GL::create_shader(self, stage.gl_enum())
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        GL::shader_source(self, shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        GL::compile_shader(self, shader);
    }

    fn shader_compile_status(&self, shader: &WebGlShader) -> bool {
        self.get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> String {
        self.get_shader_info_log(shader).unwrap_or_default()
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        GL::delete_shader(self, Some(shader));
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        GL::create_program(self)
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        GL::attach_shader(self, program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        GL::link_program(self, program);
    }

    fn program_link_status(&self, program: &WebGlProgram) -> bool {
        self.get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> String {
        self.get_program_info_log(program).unwrap_or_default()
    }

    fn delete_program(&self, program: &WebGlProgram) {
        GL::delete_program(self, Some(program));
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        GL::use_program(self, program);
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> Option<u32> {
        u32::try_from(self.get_attrib_location(program, name)).ok()
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.get_uniform_location(program, name)
    }

    fn uniform_1f(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.uniform1f(location, value);
    }

    fn uniform_2f(&self, location: Option<&WebGlUniformLocation>, value: [f32; 2]) {
        self.uniform2f(location, value[0], value[1]);
    }

    fn uniform_4f(&self, location: Option<&WebGlUniformLocation>, value: [f32; 4]) {
        self.uniform4f(location, value[0], value[1], value[2], value[3]);
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        GL::create_buffer(self)
    }

    fn delete_buffer(&self, buffer: &WebGlBuffer) {
        GL::delete_buffer(self, Some(buffer));
    }

    fn bind_array_buffer(&self, buffer: Option<&WebGlBuffer>) {
        self.bind_buffer(GL::ARRAY_BUFFER, buffer);
    }

    fn array_buffer_data(&self, data: &[f32]) {
        let view = js_sys::Float32Array::from(data);
        self.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32) {
        self.vertex_attrib_pointer_with_i32(index, size, GL::FLOAT, false, 0, 0);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        GL::enable_vertex_attrib_array(self, index);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        GL::viewport(self, x, y, width, height);
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        GL::clear_color(self, rgba[0], rgba[1], rgba[2], rgba[3]);
    }

    fn clear_color_buffer(&self) {
        self.clear(GL::COLOR_BUFFER_BIT);
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        GL::draw_arrays(self, mode.gl_enum(), first, count);
    }

    fn error(&self) -> Option<u32> {
        match self.get_error() {
            GL::NO_ERROR => None,
            code => Some(code),
        }
    }
}

/// A sized canvas together with its webgl2 context.
pub struct GlCanvas {
    pub canvas: HtmlCanvasElement,
    pub gl: GL,
}

impl GlCanvas {
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<Self, SketchError> {
        let gl = acquire_webgl2(canvas, width, height)?;
        Ok(Self {
            canvas: canvas.clone(),
            gl,
        })
    }
}

/// Sizes `canvas` to `width` x `height` pixels and obtains its webgl2 context.
pub fn acquire_webgl2(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Result<GL, SketchError> {
    canvas.set_width(width);
    canvas.set_height(height);

    let context = canvas
        .get_context("webgl2")?
        .ok_or(SketchError::ContextUnavailable)?;
    let gl: GL = context
        .dyn_into()
        .map_err(|_| SketchError::ContextUnavailable)?;

    gl.viewport(0, 0, width as i32, height as i32);
    log::debug!("acquired webgl2 context ({}x{})", width, height);
    Ok(gl)
}
