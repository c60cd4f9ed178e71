// Shader Program Pipeline
// Turns a pair of GLSL sources into a linked program
// Responsibilities:
// - Compile the vertex and fragment stages against a context
// - Link them into one program and release the intermediate shader objects
// - Report creation, compile and link failures as a typed result
// - Select the program and look up its attributes/uniforms for drawing

use std::fmt;

use crate::gpu::context::GlContext;

pub use crate::gpu::context::ShaderStage;

/// Source text for one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource<'a> {
    pub stage: ShaderStage,
    pub text: &'a str,
}

impl<'a> ShaderSource<'a> {
    pub fn vertex(text: &'a str) -> Self {
        Self { stage: ShaderStage::Vertex, text }
    }

    pub fn fragment(text: &'a str) -> Self {
        Self { stage: ShaderStage::Fragment, text }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// The context returned no shader or program object.
    ObjectCreationFailure,
    /// A stage was rejected by the shading-language compiler.
    CompileFailure,
    /// Both stages compiled but could not be linked together.
    LinkFailure,
}

impl fmt::Display for BuildErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildErrorKind::ObjectCreationFailure => write!(f, "Failed to create a GL object"),
            BuildErrorKind::CompileFailure => write!(f, "Failed to compile a shader"),
            BuildErrorKind::LinkFailure => write!(f, "Failed to link a program"),
        }
    }
}

/// Why a build attempt failed, with the compiler or linker log verbatim.
///
/// `log` is empty for [`BuildErrorKind::ObjectCreationFailure`]; the context
/// does not explain allocation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub kind: BuildErrorKind,
    pub log: String,
}

impl BuildError {
    pub fn new(kind: BuildErrorKind, log: impl Into<String>) -> Self {
        Self { kind, log: log.into() }
    }

    fn object_creation() -> Self {
        Self::new(BuildErrorKind::ObjectCreationFailure, String::new())
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.log.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}\n{}", self.kind, self.log)
        }
    }
}

impl std::error::Error for BuildError {}

pub type BuildResult<T> = Result<T, BuildError>;

/// Stateless builder for shader programs. Each call is independent.
pub struct ShaderProgramBuilder;

impl ShaderProgramBuilder {
    /// Compiles both stages and links them.
    ///
    /// Fails fast: a vertex failure never touches the fragment stage. Every
    /// shader object created during the attempt is deleted before returning,
    /// and a program that fails to link is deleted too.
    pub fn build<C: GlContext>(
        ctx: &C,
        vertex_source: &str,
        fragment_source: &str,
    ) -> BuildResult<C::Program> {
        let vertex = Self::compile(ctx, &ShaderSource::vertex(vertex_source))?;

        let fragment = match Self::compile(ctx, &ShaderSource::fragment(fragment_source)) {
            Ok(shader) => shader,
            Err(err) => {
                ctx.delete_shader(&vertex);
                return Err(err);
            }
        };

        Self::link(ctx, vertex, fragment)
    }

    /// Compiles a single stage. The shader object is deleted when compilation fails.
    pub fn compile<C: GlContext>(ctx: &C, source: &ShaderSource<'_>) -> BuildResult<C::Shader> {
        let Some(shader) = ctx.create_shader(source.stage) else {
            log::error!("Failed to create a {} shader", source.stage.name());
            return Err(BuildError::object_creation());
        };

        ctx.shader_source(&shader, source.text);
        ctx.compile_shader(&shader);

        if !ctx.shader_compile_status(&shader) {
            let info = ctx.shader_info_log(&shader);
            log::error!("Failed to compile a {} shader\n{}", source.stage.name(), info);
            ctx.delete_shader(&shader);
            return Err(BuildError::new(BuildErrorKind::CompileFailure, info));
        }

        Ok(shader)
    }

    fn link<C: GlContext>(ctx: &C, vertex: C::Shader, fragment: C::Shader) -> BuildResult<C::Program> {
        let Some(program) = ctx.create_program() else {
            log::error!("Failed to create a program");
            ctx.delete_shader(&vertex);
            ctx.delete_shader(&fragment);
            return Err(BuildError::object_creation());
        };

        ctx.attach_shader(&program, &vertex);
        ctx.attach_shader(&program, &fragment);
        // Attached shaders stay alive until the program lets go of them.
        ctx.delete_shader(&vertex);
        ctx.delete_shader(&fragment);

        ctx.link_program(&program);

        if !ctx.program_link_status(&program) {
            let info = ctx.program_info_log(&program);
            log::error!("Failed to link a program\n{}", info);
            ctx.delete_program(&program);
            return Err(BuildError::new(BuildErrorKind::LinkFailure, info));
        }

        Ok(program)
    }
}

/// A successfully linked program, owned by the sketch that built it.
#[derive(Debug)]
pub struct ShaderProgram<P> {
    program: P,
}

impl<P> ShaderProgram<P> {
    pub fn build<C>(ctx: &C, vertex_source: &str, fragment_source: &str) -> BuildResult<Self>
    where
        C: GlContext<Program = P>,
    {
        let program = ShaderProgramBuilder::build(ctx, vertex_source, fragment_source)?;
        Ok(Self { program })
    }

    pub fn bind<C: GlContext<Program = P>>(&self, ctx: &C) {
        ctx.use_program(Some(&self.program));
    }

    pub fn attrib<C: GlContext<Program = P>>(&self, ctx: &C, name: &str) -> Option<u32> {
        ctx.attrib_location(&self.program, name)
    }

    pub fn uniform<C: GlContext<Program = P>>(&self, ctx: &C, name: &str) -> Option<C::UniformLocation> {
        ctx.uniform_location(&self.program, name)
    }

    pub fn delete<C: GlContext<Program = P>>(self, ctx: &C) {
        ctx.delete_program(&self.program);
    }

    pub fn inner(&self) -> &P {
        &self.program
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
