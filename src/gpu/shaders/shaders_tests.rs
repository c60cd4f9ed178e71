use super::*;
use crate::gpu::context::GlContext;
use crate::gpu::headless::HeadlessContext;
use crate::gpu::pipeline::ShaderProgramBuilder;

// ============================================================================
// Built-in sources
// ============================================================================

#[test]
fn test_dot_shaders_link() {
    let ctx = HeadlessContext::new();
    let fragment = ShaderManager::generate_color_fragment_shader([1.0, 0.0, 0.0, 1.0]);

    assert!(ShaderProgramBuilder::build(&ctx, DOT_VERTEX, &fragment).is_ok());
}

#[test]
fn test_grid_shaders_link() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgramBuilder::build(&ctx, GRID_VERTEX, GRID_FRAGMENT).unwrap();

    assert_eq!(ctx.attrib_location(&program, "position"), Some(0));
    assert!(ctx.uniform_location(&program, "size").is_some());
}

#[test]
fn test_shape_shaders_link() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgramBuilder::build(&ctx, SHAPE_VERTEX, SHAPE_FRAGMENT).unwrap();

    for uniform in ["u_color", "u_offset", "u_point_size"] {
        assert!(ctx.uniform_location(&program, uniform).is_some(), "{uniform}");
    }
}

// ============================================================================
// Generated sources
// ============================================================================

#[test]
fn test_generated_fragment_embeds_color() {
    let source = ShaderManager::generate_color_fragment_shader([1.0, 0.5, 0.0, 1.0]);

    assert!(source.contains("precision mediump float;"));
    assert!(source.contains("gl_FragColor = vec4(1.0, 0.5, 0.0, 1.0);"));
}

#[test]
fn test_generated_fragment_keeps_whole_numbers_as_floats() {
    // GLSL ES 1.00 has no implicit int to float conversion
    let source = ShaderManager::generate_color_fragment_shader([0.0, 0.0, 1.0, 1.0]);

    assert!(!source.contains("vec4(0, "));
    assert!(source.contains("vec4(0.0, 0.0, 1.0, 1.0)"));
}
