//! Drives the sketches' renderers the way the components do, minus the browser.

use webgl_sketches::config::SketchConfig;
use webgl_sketches::gpu::context::{DrawMode, GlContext};
use webgl_sketches::gpu::dot::{create_dot_program, draw_dot};
use webgl_sketches::gpu::grid::GridRenderer;
use webgl_sketches::gpu::headless::HeadlessContext;
use webgl_sketches::gpu::shapes::{FrameOffset, ShapeRenderer, figure, showcase};
use webgl_sketches::pixel_grid::{PixelGrid, hex_to_rgba};

#[test]
fn dot_sketch_with_bundled_config() {
    let config = SketchConfig::bundled().unwrap().dot;
    let ctx = HeadlessContext::new();
    ctx.viewport(0, 0, config.width as i32, config.height as i32);

    let program = create_dot_program(&ctx, hex_to_rgba(&config.color).unwrap()).unwrap();
    draw_dot(&ctx, &program, config.clear_color).unwrap();

    assert_eq!(ctx.current_viewport(), [0, 0, 300, 300]);
    assert_eq!(ctx.last_clear_color(), [0.0, 0.0, 0.5, 1.0]);
    assert_eq!(ctx.draw_calls().len(), 1);
}

#[test]
fn grid_sketch_click_paint_and_erase() {
    let config = SketchConfig::default().grid;
    let ctx = HeadlessContext::new();
    let renderer = GridRenderer::new(&ctx).unwrap();
    let mut grid = PixelGrid::new(config.size, config.dot_size);

    // A click at CSS offset (50, 20) on a 2x display lands in cell (3, 1)
    let (x, y) = grid.cell_at(50.0, 20.0, 2.0).unwrap();
    assert_eq!((x, y), (3, 1));
    grid.record(x, y, Some(&config.paint_color)).unwrap();
    renderer.draw(&ctx, &grid, config.clear_color).unwrap();

    let frame = ctx.draw_calls();
    assert_eq!(frame.len(), 2);
    assert_eq!(frame[0].mode, DrawMode::TriangleStrip);
    assert_eq!(frame[1].mode, DrawMode::Points);
    assert_eq!(frame[1].vertices, grid.cell_center(3, 1).to_vec());

    grid.record(x, y, None).unwrap();
    renderer.draw(&ctx, &grid, config.clear_color).unwrap();
    assert_eq!(ctx.draw_calls().len(), 3);
}

#[test]
fn shapes_sketch_static_and_animated() {
    let ctx = HeadlessContext::new();
    let renderer = ShapeRenderer::new(&ctx).unwrap();

    renderer.draw_all(&ctx, &showcase(), [0.0, 0.0]);
    let static_draws = ctx.draw_calls().len();
    assert_eq!(static_draws, showcase().len());

    let body = figure([0.0, 0.6], 1.0);
    let mut offset = FrameOffset::new(0.01);
    for _ in 0..3 {
        renderer.draw_all(&ctx, &body, offset.advance());
    }

    let draws = ctx.draw_calls();
    assert_eq!(draws.len(), static_draws + 3 * body.len());
    let last = &draws[draws.len() - 1];
    assert_eq!(last.uniforms["u_offset"], vec![offset.x, 0.0]);
    assert_eq!(ctx.error(), None);
}
