use crate::error::{SketchError, SketchResult};
use crate::gpu::context::{DrawMode, GlContext};
use crate::gpu::pipeline::ShaderProgram;
use crate::gpu::shaders::{SHAPE_FRAGMENT, SHAPE_VERTEX};

pub const DEFAULT_POINT_SIZE: f32 = 10.0;

/// A flat-colored set of 2D clip-space vertices and how to rasterize them.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub mode: DrawMode,
    pub vertices: Vec<[f32; 2]>,
    pub color: [f32; 4],
    pub point_size: f32,
}

impl Shape {
    pub fn new(mode: DrawMode, vertices: Vec<[f32; 2]>, color: [f32; 4]) -> Self {
        Self {
            mode,
            vertices,
            color,
            point_size: DEFAULT_POINT_SIZE,
        }
    }

    pub fn point(at: [f32; 2], color: [f32; 4]) -> Self {
        Self::new(DrawMode::Points, vec![at], color)
    }

    pub fn points(at: &[[f32; 2]], color: [f32; 4]) -> Self {
        Self::new(DrawMode::Points, at.to_vec(), color)
    }

    pub fn line(from: [f32; 2], to: [f32; 2], color: [f32; 4]) -> Self {
        Self::new(DrawMode::Lines, vec![from, to], color)
    }

    pub fn polyline(path: &[[f32; 2]], color: [f32; 4]) -> Self {
        Self::new(DrawMode::LineStrip, path.to_vec(), color)
    }

    /// Axis-aligned rectangle with its top-left corner at (`x`, `y`).
    pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Self {
        let right = x + width;
        let bottom = y - height;
        Self::new(
            DrawMode::TriangleStrip,
            vec![[right, y], [x, y], [right, bottom], [x, bottom]],
            color,
        )
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertices.len() as i32
    }

    fn flattened(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| [v[0], v[1]]).collect()
    }
}

/// The cartoon figure: head, eyes, body, arms and legs, all rectangles.
///
/// `origin` is the top of the head; `scale` 1.0 spans roughly a third of the canvas.
pub fn figure(origin: [f32; 2], scale: f32) -> Vec<Shape> {
    const SKIN: [f32; 4] = [1.0, 0.8, 0.6, 1.0];
    const EYE: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    const SHIRT: [f32; 4] = [0.2, 0.4, 0.9, 1.0];
    const TROUSERS: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

    let [ox, oy] = origin;
    let r = |x: f32, y: f32, w: f32, h: f32, color| {
        Shape::rect(ox + x * scale, oy - y * scale, w * scale, h * scale, color)
    };

    vec![
        r(-0.1, 0.0, 0.2, 0.2, SKIN),
        r(-0.06, 0.06, 0.04, 0.04, EYE),
        r(0.02, 0.06, 0.04, 0.04, EYE),
        r(-0.15, 0.22, 0.3, 0.35, SHIRT),
        r(-0.27, 0.24, 0.1, 0.3, SHIRT),
        r(0.17, 0.24, 0.1, 0.3, SHIRT),
        r(-0.13, 0.59, 0.1, 0.35, TROUSERS),
        r(0.03, 0.59, 0.1, 0.35, TROUSERS),
    ]
}

/// Points, lines, a rectangle and the figure on one canvas.
pub fn showcase() -> Vec<Shape> {
    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const GREEN: [f32; 4] = [0.0, 0.6, 0.0, 1.0];
    const ORANGE: [f32; 4] = [1.0, 0.6, 0.0, 1.0];

    let mut scene = vec![
        Shape::points(&[[-0.8, 0.8], [-0.6, 0.8], [-0.4, 0.8]], RED),
        Shape::line([-0.9, -0.9], [0.9, -0.9], GREEN),
        Shape::polyline(&[[-0.9, -0.5], [-0.7, -0.3], [-0.5, -0.5], [-0.3, -0.3]], GREEN),
        Shape::rect(0.4, 0.9, 0.4, 0.3, ORANGE),
    ];
    scene.extend(figure([0.0, 0.6], 1.0));
    scene
}

/// The single animated literal: a horizontal offset that slides right and wraps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOffset {
    pub x: f32,
    pub step: f32,
}

impl FrameOffset {
    pub fn new(step: f32) -> Self {
        Self { x: -1.0, step }
    }

    pub fn advance(&mut self) -> [f32; 2] {
        self.x += self.step;
        if self.x > 1.0 {
            self.x = -1.0;
        }
        [self.x, 0.0]
    }
}

/// Draws [`Shape`]s with one flat-color program and one shared vertex buffer.
pub struct ShapeRenderer<C: GlContext> {
    program: ShaderProgram<C::Program>,
    buffer: C::Buffer,
    position: u32,
    color: Option<C::UniformLocation>,
    offset: Option<C::UniformLocation>,
    point_size: Option<C::UniformLocation>,
}

impl<C: GlContext> ShapeRenderer<C> {
    pub fn new(ctx: &C) -> SketchResult<Self> {
        let program = ShaderProgram::build(ctx, SHAPE_VERTEX, SHAPE_FRAGMENT)?;

        let Some(position) = program.attrib(ctx, "position") else {
            program.delete(ctx);
            return Err(SketchError::MissingAttribute("position".to_string()));
        };
        let Some(buffer) = ctx.create_buffer() else {
            program.delete(ctx);
            return Err(SketchError::BufferCreation);
        };

        Ok(Self {
            color: program.uniform(ctx, "u_color"),
            offset: program.uniform(ctx, "u_offset"),
            point_size: program.uniform(ctx, "u_point_size"),
            program,
            buffer,
            position,
        })
    }

    pub fn draw(&self, ctx: &C, shape: &Shape, offset: [f32; 2]) {
        if shape.vertices.is_empty() {
            return;
        }
        self.program.bind(ctx);

        ctx.bind_array_buffer(Some(&self.buffer));
        ctx.array_buffer_data(&shape.flattened());
        ctx.vertex_attrib_pointer_f32(self.position, 2);
        ctx.enable_vertex_attrib_array(self.position);

        ctx.uniform_4f(self.color.as_ref(), shape.color);
        ctx.uniform_2f(self.offset.as_ref(), offset);
        ctx.uniform_1f(self.point_size.as_ref(), shape.point_size);

        ctx.draw_arrays(shape.mode, 0, shape.vertex_count());
    }

    pub fn draw_all(&self, ctx: &C, shapes: &[Shape], offset: [f32; 2]) {
        for shape in shapes {
            self.draw(ctx, shape, offset);
        }
    }

    pub fn program(&self) -> &ShaderProgram<C::Program> {
        &self.program
    }

    pub fn delete(self, ctx: &C) {
        ctx.delete_buffer(&self.buffer);
        self.program.delete(ctx);
    }
}

#[cfg(test)]
#[path = "shapes_tests.rs"]
mod tests;
