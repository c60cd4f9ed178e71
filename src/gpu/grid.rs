use crate::error::{SketchError, SketchResult};
use crate::gpu::context::{DrawMode, GlContext};
use crate::gpu::pipeline::ShaderProgram;
use crate::gpu::shaders::{GRID_FRAGMENT, GRID_VERTEX};
use crate::gpu::shapes::{Shape, ShapeRenderer};
use crate::gpu::utils;
use crate::pixel_grid::PixelGrid;

/// Full-screen quad as a triangle strip, three components per vertex.
pub const QUAD: [f32; 12] = [
    1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, -1.0, 0.0,
];

/// Draws the grid lines, then paints recorded cells over them as square points.
pub struct GridRenderer<C: GlContext> {
    program: ShaderProgram<C::Program>,
    quad: C::Buffer,
    position: u32,
    size: Option<C::UniformLocation>,
    cells: ShapeRenderer<C>,
}

impl<C: GlContext> GridRenderer<C> {
    pub fn new(ctx: &C) -> SketchResult<Self> {
        let program = ShaderProgram::build(ctx, GRID_VERTEX, GRID_FRAGMENT)?;

        let Some(position) = program.attrib(ctx, "position") else {
            program.delete(ctx);
            return Err(SketchError::MissingAttribute("position".to_string()));
        };
        let quad = match utils::create_static_buffer(ctx, &QUAD) {
            Ok(buffer) => buffer,
            Err(err) => {
                program.delete(ctx);
                return Err(err);
            }
        };
        let cells = match ShapeRenderer::new(ctx) {
            Ok(cells) => cells,
            Err(err) => {
                ctx.delete_buffer(&quad);
                program.delete(ctx);
                return Err(err);
            }
        };

        Ok(Self {
            size: program.uniform(ctx, "size"),
            program,
            quad,
            position,
            cells,
        })
    }

    pub fn draw(&self, ctx: &C, grid: &PixelGrid, clear_color: [f32; 4]) -> SketchResult<()> {
        utils::clear_screen(ctx, clear_color);

        let dot = grid.dot_size() as f32;
        self.program.bind(ctx);
        ctx.uniform_1f(self.size.as_ref(), dot);
        ctx.bind_array_buffer(Some(&self.quad));
        ctx.vertex_attrib_pointer_f32(self.position, 3);
        ctx.enable_vertex_attrib_array(self.position);
        ctx.draw_arrays(DrawMode::TriangleStrip, 0, 4);

        for pixel in grid.pixels() {
            let [r, g, b] = pixel.color;
            let cell = Shape::point(grid.cell_center(pixel.x, pixel.y), [r, g, b, 1.0]).with_point_size(dot);
            self.cells.draw(ctx, &cell, [0.0, 0.0]);
        }

        utils::check_error(ctx, "grid draw")
    }

    pub fn delete(self, ctx: &C) {
        self.cells.delete(ctx);
        ctx.delete_buffer(&self.quad);
        self.program.delete(ctx);
    }
}

#[cfg(test)]
#[path = "grid_tests.rs"]
mod tests;
