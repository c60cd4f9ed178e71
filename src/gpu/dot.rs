use crate::error::SketchResult;
use crate::gpu::context::{DrawMode, GlContext};
use crate::gpu::pipeline::{BuildResult, ShaderProgram};
use crate::gpu::shaders::{DOT_VERTEX, ShaderManager};
use crate::gpu::utils;

pub fn create_dot_program<C: GlContext>(ctx: &C, color: [f32; 4]) -> BuildResult<ShaderProgram<C::Program>> {
    let fragment = ShaderManager::generate_color_fragment_shader(color);
    ShaderProgram::build(ctx, DOT_VERTEX, &fragment)
}

pub fn draw_dot<C: GlContext>(ctx: &C, program: &ShaderProgram<C::Program>, clear_color: [f32; 4]) -> SketchResult<()> {
    utils::clear_screen(ctx, clear_color);
    program.bind(ctx);
    ctx.draw_arrays(DrawMode::Points, 0, 1);
    utils::check_error(ctx, "dot draw")
}

#[cfg(test)]
#[path = "dot_tests.rs"]
mod tests;
