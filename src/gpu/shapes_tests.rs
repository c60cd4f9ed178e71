use super::*;
use crate::gpu::headless::HeadlessContext;
use crate::gpu::pipeline::BuildErrorKind;

const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

// ============================================================================
// Shape constructors
// ============================================================================

#[test]
fn test_rect_is_a_four_vertex_strip() {
    let rect = Shape::rect(-0.5, 0.5, 1.0, 1.0, BLUE);

    assert_eq!(rect.mode, DrawMode::TriangleStrip);
    assert_eq!(rect.vertices, vec![[0.5, 0.5], [-0.5, 0.5], [0.5, -0.5], [-0.5, -0.5]]);
    assert_eq!(rect.vertex_count(), 4);
}

#[test]
fn test_line_and_polyline_modes() {
    assert_eq!(Shape::line([0.0, 0.0], [1.0, 1.0], BLUE).mode, DrawMode::Lines);

    let path = Shape::polyline(&[[0.0, 0.0], [0.5, 0.5], [1.0, 0.0]], BLUE);
    assert_eq!(path.mode, DrawMode::LineStrip);
    assert_eq!(path.vertex_count(), 3);
}

#[test]
fn test_points_default_and_custom_size() {
    let point = Shape::point([0.0, 0.0], BLUE);
    assert_eq!(point.point_size, DEFAULT_POINT_SIZE);

    let big = point.with_point_size(32.0);
    assert_eq!(big.point_size, 32.0);
    assert_eq!(big.mode, DrawMode::Points);
}

#[test]
fn test_flattened_interleaves_coordinates() {
    let shape = Shape::points(&[[1.0, 2.0], [3.0, 4.0]], BLUE);

    assert_eq!(shape.flattened(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_figure_is_made_of_rects() {
    let parts = figure([0.0, 0.6], 1.0);

    assert_eq!(parts.len(), 8);
    assert!(parts.iter().all(|p| p.mode == DrawMode::TriangleStrip && p.vertex_count() == 4));
}

#[test]
fn test_showcase_contains_every_mode() {
    let scene = showcase();

    for mode in [DrawMode::Points, DrawMode::Lines, DrawMode::LineStrip, DrawMode::TriangleStrip] {
        assert!(scene.iter().any(|s| s.mode == mode), "{mode:?}");
    }
}

// ============================================================================
// FrameOffset
// ============================================================================

#[test]
fn test_frame_offset_wraps_past_right_edge() {
    let mut offset = FrameOffset::new(0.5);

    assert_eq!(offset.advance(), [-0.5, 0.0]);
    assert_eq!(offset.advance(), [0.0, 0.0]);
    assert_eq!(offset.advance(), [0.5, 0.0]);
    assert_eq!(offset.advance(), [1.0, 0.0]);
    assert_eq!(offset.advance(), [-1.0, 0.0]);
}

// ============================================================================
// ShapeRenderer
// ============================================================================

#[test]
fn test_renderer_draw_uploads_vertices_and_uniforms() {
    let ctx = HeadlessContext::new();
    let renderer = ShapeRenderer::new(&ctx).unwrap();
    let rect = Shape::rect(-0.5, 0.5, 1.0, 1.0, BLUE);

    renderer.draw(&ctx, &rect, [0.25, 0.0]);

    let draws = ctx.draw_calls();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].mode, DrawMode::TriangleStrip);
    assert_eq!(draws[0].count, 4);
    assert_eq!(draws[0].vertices, vec![0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, -0.5]);
    assert_eq!(draws[0].uniforms["u_color"], BLUE.to_vec());
    assert_eq!(draws[0].uniforms["u_offset"], vec![0.25, 0.0]);
    assert_eq!(draws[0].uniforms["u_point_size"], vec![DEFAULT_POINT_SIZE]);
    assert_eq!(ctx.error(), None);
}

#[test]
fn test_renderer_skips_empty_shapes() {
    let ctx = HeadlessContext::new();
    let renderer = ShapeRenderer::new(&ctx).unwrap();

    renderer.draw(&ctx, &Shape::points(&[], BLUE), [0.0, 0.0]);

    assert!(ctx.draw_calls().is_empty());
}

#[test]
fn test_renderer_draws_whole_showcase() {
    let ctx = HeadlessContext::new();
    let renderer = ShapeRenderer::new(&ctx).unwrap();
    let scene = showcase();

    renderer.draw_all(&ctx, &scene, [0.0, 0.0]);

    assert_eq!(ctx.draw_calls().len(), scene.len());
    assert_eq!(ctx.error(), None);
}

#[test]
fn test_renderer_cleans_up_when_buffer_fails() {
    let ctx = HeadlessContext::new();
    // Two shaders and a program fit, the buffer does not
    ctx.fail_allocations_after(3);

    let result = ShapeRenderer::new(&ctx);
    assert!(matches!(result, Err(SketchError::BufferCreation)));
    assert_eq!(ctx.live_programs(), 0);
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_renderer_reports_build_failure() {
    let ctx = HeadlessContext::new();
    ctx.lose_context();

    match ShapeRenderer::new(&ctx) {
        Err(SketchError::Build(err)) => assert_eq!(err.kind, BuildErrorKind::ObjectCreationFailure),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_renderer_delete_releases_program_and_buffer() {
    let ctx = HeadlessContext::new();
    let renderer = ShapeRenderer::new(&ctx).unwrap();
    assert!(ctx.is_linked(renderer.program().inner()));

    renderer.delete(&ctx);
    assert_eq!(ctx.live_programs(), 0);
    assert_eq!(ctx.live_buffers(), 0);
}
