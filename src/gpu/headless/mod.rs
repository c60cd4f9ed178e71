// Headless Context
// An in-memory GlContext that needs no browser
// Responsibilities:
// - Own shader, program and buffer objects with GL deletion semantics
// - Compile and link through the small GLSL front end in `glsl`
// - Validate draws and raise GL error codes the way WebGL does
// - Record clears, uniforms and draw calls for inspection
// - Inject allocation failures and context loss

mod glsl;

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::gpu::context::{
    DrawMode, GlContext, INVALID_OPERATION, INVALID_VALUE, ShaderStage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessShader(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadlessProgram(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessBuffer(u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadlessUniform {
    program: HeadlessProgram,
    name: String,
}

impl HeadlessUniform {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One `draw_arrays` call, with the state it was issued against.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: HeadlessProgram,
    pub mode: DrawMode,
    pub first: i32,
    pub count: i32,
    /// Contents of the buffer feeding the lowest enabled attribute.
    pub vertices: Vec<f32>,
    /// Uniform values of `program` at the time of the draw.
    pub uniforms: BTreeMap<String, Vec<f32>>,
}

#[derive(Debug)]
struct ShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
    interface: Option<glsl::Interface>,
    delete_pending: bool,
    attachments: usize,
}

#[derive(Debug, Default)]
struct ProgramObject {
    shaders: Vec<u32>,
    linked: bool,
    info_log: String,
    attributes: Vec<String>,
    uniforms: BTreeMap<String, Vec<f32>>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    lost: bool,
    allocation_budget: Option<usize>,

    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashMap<u32, Vec<f32>>,
    shaders_created: usize,
    programs_created: usize,
    compiles: usize,

    current_program: Option<u32>,
    array_buffer: Option<u32>,
    attribute_buffers: HashMap<u32, (u32, i32)>,
    enabled_attributes: BTreeSet<u32>,

    viewport: [i32; 4],
    clear_color: [f32; 4],
    clears: usize,
    draws: Vec<DrawCall>,
    error: Option<u32>,
}

impl State {
    fn allocate(&mut self) -> Option<u32> {
        if self.lost {
            return None;
        }
        if let Some(budget) = self.allocation_budget.as_mut() {
            if *budget == 0 {
                return None;
            }
            *budget -= 1;
        }
        self.next_id += 1;
        Some(self.next_id)
    }

    fn raise(&mut self, code: u32) {
        // Only the first error is kept until it is read.
        if self.error.is_none() {
            self.error = Some(code);
        }
    }

    fn reap_shader(&mut self, id: u32) {
        let reclaim = self
            .shaders
            .get(&id)
            .is_some_and(|shader| shader.delete_pending && shader.attachments == 0);
        if reclaim {
            self.shaders.remove(&id);
        }
    }
}

/// Deterministic stand-in for a WebGL2 context.
#[derive(Debug, Default)]
pub struct HeadlessContext {
    state: RefCell<State>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets the next `n` object allocations succeed, then refuses every one after.
    pub fn fail_allocations_after(&self, n: usize) {
        self.state.borrow_mut().allocation_budget = Some(n);
    }

    /// Simulates a lost context: every allocation fails until restored.
    pub fn lose_context(&self) {
        self.state.borrow_mut().lost = true;
    }

    pub fn restore_context(&self) {
        let mut state = self.state.borrow_mut();
        state.lost = false;
        state.allocation_budget = None;
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub fn programs_created(&self) -> usize {
        self.state.borrow().programs_created
    }

    pub fn compile_count(&self) -> usize {
        self.state.borrow().compiles
    }

    /// Shader objects that still exist, including ones only kept alive by an attachment.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Shader objects that exist and have not been deleted by the caller.
    pub fn undeleted_shaders(&self) -> usize {
        self.state
            .borrow()
            .shaders
            .values()
            .filter(|shader| !shader.delete_pending)
            .count()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn is_linked(&self, program: &HeadlessProgram) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .is_some_and(|p| p.linked)
    }

    pub fn current_program(&self) -> Option<HeadlessProgram> {
        self.state.borrow().current_program.map(HeadlessProgram)
    }

    pub fn uniform_value(&self, program: &HeadlessProgram, name: &str) -> Option<Vec<f32>> {
        let state = self.state.borrow();
        let value = state.programs.get(&program.0)?.uniforms.get(name)?;
        (!value.is_empty()).then(|| value.clone())
    }

    pub fn buffer_data(&self, buffer: &HeadlessBuffer) -> Option<Vec<f32>> {
        self.state.borrow().buffers.get(&buffer.0).cloned()
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.borrow().draws.clone()
    }

    pub fn clear_count(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn last_clear_color(&self) -> [f32; 4] {
        self.state.borrow().clear_color
    }

    pub fn current_viewport(&self) -> [i32; 4] {
        self.state.borrow().viewport
    }
}

impl GlContext for HeadlessContext {
    type Shader = HeadlessShader;
    type Program = HeadlessProgram;
    type Buffer = HeadlessBuffer;
    type UniformLocation = HeadlessUniform;

    fn create_shader(&self, stage: ShaderStage) -> Option<HeadlessShader> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.shaders.insert(
            id,
            ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
                interface: None,
                delete_pending: false,
                attachments: 0,
            },
        );
        state.shaders_created += 1;
        Some(HeadlessShader(id))
    }

    fn shader_source(&self, shader: &HeadlessShader, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader.0) {
            Some(object) => object.source = source.to_string(),
            None => state.raise(INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: &HeadlessShader) {
        let mut state = self.state.borrow_mut();
        state.compiles += 1;
        let Some(object) = state.shaders.get_mut(&shader.0) else {
            state.raise(INVALID_VALUE);
            return;
        };
        match glsl::compile(object.stage, &object.source) {
            Ok(interface) => {
                object.compiled = true;
                object.info_log.clear();
                object.interface = Some(interface);
            }
            Err(info) => {
                object.compiled = false;
                object.info_log = info;
                object.interface = None;
            }
        }
    }

    fn shader_compile_status(&self, shader: &HeadlessShader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .is_some_and(|object| object.compiled)
    }

    fn shader_info_log(&self, shader: &HeadlessShader) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|object| object.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: &HeadlessShader) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader.0) {
            Some(object) => object.delete_pending = true,
            None => return state.raise(INVALID_VALUE),
        }
        state.reap_shader(shader.0);
    }

    fn create_program(&self) -> Option<HeadlessProgram> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.programs.insert(id, ProgramObject::default());
        state.programs_created += 1;
        Some(HeadlessProgram(id))
    }

    fn attach_shader(&self, program: &HeadlessProgram, shader: &HeadlessShader) {
        let mut state = self.state.borrow_mut();
        let Some(stage) = state.shaders.get(&shader.0).map(|s| s.stage) else {
            return state.raise(INVALID_VALUE);
        };
        let duplicate_stage = match state.programs.get(&program.0) {
            Some(p) => p
                .shaders
                .iter()
                .any(|id| state.shaders.get(id).is_some_and(|s| s.stage == stage)),
            None => return state.raise(INVALID_VALUE),
        };
        if duplicate_stage {
            return state.raise(INVALID_OPERATION);
        }
        if let Some(p) = state.programs.get_mut(&program.0) {
            p.shaders.push(shader.0);
        }
        if let Some(s) = state.shaders.get_mut(&shader.0) {
            s.attachments += 1;
        }
    }

    fn link_program(&self, program: &HeadlessProgram) {
        let mut state = self.state.borrow_mut();
        let Some(attached) = state.programs.get(&program.0).map(|p| p.shaders.clone()) else {
            return state.raise(INVALID_VALUE);
        };

        let interface_of = |stage: ShaderStage| {
            attached
                .iter()
                .filter_map(|id| state.shaders.get(id))
                .find(|s| s.stage == stage)
                .map(|s| (s.compiled, s.interface.clone()))
        };

        let result = match (interface_of(ShaderStage::Vertex), interface_of(ShaderStage::Fragment)) {
            (None, _) => Err("ERROR: Missing vertex shader\n".to_string()),
            (_, None) => Err("ERROR: Missing fragment shader\n".to_string()),
            (Some((true, Some(vertex))), Some((true, Some(fragment)))) => glsl::link(&vertex, &fragment),
            _ => Err("ERROR: Attached shader is not compiled\n".to_string()),
        };

        let Some(object) = state.programs.get_mut(&program.0) else {
            return;
        };
        match result {
            Ok(linked) => {
                object.linked = true;
                object.info_log.clear();
                object.attributes = linked.attributes;
                object.uniforms = linked
                    .uniforms
                    .into_iter()
                    .map(|name| (name, Vec::new()))
                    .collect();
            }
            Err(info) => {
                object.linked = false;
                object.info_log = info;
                object.attributes.clear();
                object.uniforms.clear();
            }
        }
    }

    fn program_link_status(&self, program: &HeadlessProgram) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: &HeadlessProgram) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: &HeadlessProgram) {
        let mut state = self.state.borrow_mut();
        let Some(object) = state.programs.remove(&program.0) else {
            return state.raise(INVALID_VALUE);
        };
        for id in object.shaders {
            if let Some(shader) = state.shaders.get_mut(&id) {
                shader.attachments = shader.attachments.saturating_sub(1);
            }
            state.reap_shader(id);
        }
        if state.current_program == Some(program.0) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<&HeadlessProgram>) {
        let mut state = self.state.borrow_mut();
        let Some(p) = program else {
            state.current_program = None;
            return;
        };
        match state.programs.get(&p.0).map(|object| object.linked) {
            Some(true) => state.current_program = Some(p.0),
            Some(false) => state.raise(INVALID_OPERATION),
            None => state.raise(INVALID_VALUE),
        }
    }

    fn attrib_location(&self, program: &HeadlessProgram, name: &str) -> Option<u32> {
        let state = self.state.borrow();
        let object = state.programs.get(&program.0).filter(|p| p.linked)?;
        let index = object.attributes.iter().position(|a| a == name)?;
        u32::try_from(index).ok()
    }

    fn uniform_location(&self, program: &HeadlessProgram, name: &str) -> Option<HeadlessUniform> {
        let state = self.state.borrow();
        let object = state.programs.get(&program.0).filter(|p| p.linked)?;
        object.uniforms.contains_key(name).then(|| HeadlessUniform {
            program: *program,
            name: name.to_string(),
        })
    }

    fn uniform_1f(&self, location: Option<&HeadlessUniform>, value: f32) {
        self.set_uniform(location, vec![value]);
    }

    fn uniform_2f(&self, location: Option<&HeadlessUniform>, value: [f32; 2]) {
        self.set_uniform(location, value.to_vec());
    }

    fn uniform_4f(&self, location: Option<&HeadlessUniform>, value: [f32; 4]) {
        self.set_uniform(location, value.to_vec());
    }

    fn create_buffer(&self) -> Option<HeadlessBuffer> {
        let mut state = self.state.borrow_mut();
        let id = state.allocate()?;
        state.buffers.insert(id, Vec::new());
        Some(HeadlessBuffer(id))
    }

    fn delete_buffer(&self, buffer: &HeadlessBuffer) {
        let mut state = self.state.borrow_mut();
        if state.buffers.remove(&buffer.0).is_none() {
            return state.raise(INVALID_VALUE);
        }
        if state.array_buffer == Some(buffer.0) {
            state.array_buffer = None;
        }
        state.attribute_buffers.retain(|_, (bound, _)| *bound != buffer.0);
    }

    fn bind_array_buffer(&self, buffer: Option<&HeadlessBuffer>) {
        let mut state = self.state.borrow_mut();
        match buffer {
            None => state.array_buffer = None,
            Some(b) if state.buffers.contains_key(&b.0) => state.array_buffer = Some(b.0),
            Some(_) => state.raise(INVALID_OPERATION),
        }
    }

    fn array_buffer_data(&self, data: &[f32]) {
        let mut state = self.state.borrow_mut();
        let Some(bound) = state.array_buffer else {
            return state.raise(INVALID_OPERATION);
        };
        if let Some(contents) = state.buffers.get_mut(&bound) {
            *contents = data.to_vec();
        }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32) {
        let mut state = self.state.borrow_mut();
        if !(1..=4).contains(&size) {
            return state.raise(INVALID_VALUE);
        }
        let Some(bound) = state.array_buffer else {
            return state.raise(INVALID_OPERATION);
        };
        state.attribute_buffers.insert(index, (bound, size));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state.borrow_mut().enabled_attributes.insert(index);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        if width < 0 || height < 0 {
            return state.raise(INVALID_VALUE);
        }
        state.viewport = [x, y, width, height];
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.state.borrow_mut().clear_color = rgba;
    }

    fn clear_color_buffer(&self) {
        self.state.borrow_mut().clears += 1;
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        let mut state = self.state.borrow_mut();
        if first < 0 || count < 0 {
            return state.raise(INVALID_VALUE);
        }
        let Some(program) = state.current_program else {
            return state.raise(INVALID_OPERATION);
        };

        let vertices = state
            .enabled_attributes
            .iter()
            .find_map(|index| state.attribute_buffers.get(index))
            .and_then(|(buffer, _)| state.buffers.get(buffer))
            .cloned()
            .unwrap_or_default();
        let uniforms = state
            .programs
            .get(&program)
            .map(|p| p.uniforms.clone())
            .unwrap_or_default();

        state.draws.push(DrawCall {
            program: HeadlessProgram(program),
            mode,
            first,
            count,
            vertices,
            uniforms,
        });
    }

    fn error(&self) -> Option<u32> {
        self.state.borrow_mut().error.take()
    }
}

impl HeadlessContext {
    fn set_uniform(&self, location: Option<&HeadlessUniform>, value: Vec<f32>) {
        // A missing location is silently ignored, as in WebGL.
        let Some(location) = location else {
            return;
        };
        let mut state = self.state.borrow_mut();
        if state.current_program != Some(location.program.0) {
            return state.raise(INVALID_OPERATION);
        }
        match state
            .programs
            .get_mut(&location.program.0)
            .and_then(|p| p.uniforms.get_mut(&location.name))
        {
            Some(slot) => *slot = value,
            None => state.raise(INVALID_OPERATION),
        }
    }
}

#[cfg(test)]
#[path = "headless_tests.rs"]
mod tests;
