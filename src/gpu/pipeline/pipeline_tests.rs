use super::*;
use crate::gpu::context::DrawMode;
use crate::gpu::headless::HeadlessContext;
use crate::gpu::shaders::{SHAPE_FRAGMENT, SHAPE_VERTEX};

const VERTEX: &str = "void main(){gl_Position=vec4(0.,0.,0.,1.);}";
const FRAGMENT: &str = "void main(){gl_FragColor=vec4(0.,1.,0.,1.);}";

// ============================================================================
// Success path
// ============================================================================

#[test]
fn test_build_valid_pair_links() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).expect("valid sources");

    assert!(ctx.is_linked(&program));
    assert_eq!(ctx.shaders_created(), 2);
    assert_eq!(ctx.programs_created(), 1);
}

#[test]
fn test_build_marks_both_shaders_for_deletion() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap();

    // Still attached, so still alive, but already released by the builder
    assert_eq!(ctx.live_shaders(), 2);
    assert_eq!(ctx.undeleted_shaders(), 0);

    ctx.delete_program(&program);
    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.live_programs(), 0);
}

#[test]
fn test_build_twice_gives_independent_programs() {
    let ctx = HeadlessContext::new();
    let first = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap();
    let second = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap();

    assert_ne!(first, second);
    ctx.delete_program(&first);
    assert!(ctx.is_linked(&second));
    assert_eq!(ctx.live_programs(), 1);
}

#[test]
fn test_built_program_draws_a_point_without_error() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap();

    ctx.use_program(Some(&program));
    ctx.draw_arrays(DrawMode::Points, 0, 1);

    assert_eq!(ctx.error(), None);
    assert_eq!(ctx.draw_calls().len(), 1);
}

// ============================================================================
// Compile failures
// ============================================================================

#[test]
fn test_vertex_compile_failure_never_touches_fragment() {
    let ctx = HeadlessContext::new();
    let err = ShaderProgramBuilder::build(&ctx, "this is not glsl", FRAGMENT).unwrap_err();

    assert_eq!(err.kind, BuildErrorKind::CompileFailure);
    assert!(err.log.contains("syntax error"));
    assert_eq!(ctx.shaders_created(), 1);
    assert_eq!(ctx.compile_count(), 1);
    assert_eq!(ctx.programs_created(), 0);
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_fragment_compile_failure_deletes_both_shaders() {
    let ctx = HeadlessContext::new();
    let broken = "void main(){gl_FragColor=vec4(0.,1.,0.,1.);";
    let err = ShaderProgramBuilder::build(&ctx, VERTEX, broken).unwrap_err();

    assert_eq!(err.kind, BuildErrorKind::CompileFailure);
    assert!(!err.log.is_empty());
    assert_eq!(ctx.shaders_created(), 2);
    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.programs_created(), 0);
}

// ============================================================================
// Link failures
// ============================================================================

#[test]
fn test_link_failure_deletes_program() {
    let ctx = HeadlessContext::new();
    let fragment = "precision mediump float; varying vec4 v_color; void main(){gl_FragColor=v_color;}";
    let err = ShaderProgramBuilder::build(&ctx, VERTEX, fragment).unwrap_err();

    assert_eq!(err.kind, BuildErrorKind::LinkFailure);
    assert!(err.log.contains("v_color"));
    assert_eq!(ctx.programs_created(), 1);
    assert_eq!(ctx.live_programs(), 0);
    assert_eq!(ctx.live_shaders(), 0);
}

// ============================================================================
// Object creation failures
// ============================================================================

#[test]
fn test_vertex_object_creation_failure() {
    let ctx = HeadlessContext::new();
    ctx.fail_allocations_after(0);

    let err = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap_err();
    assert_eq!(err.kind, BuildErrorKind::ObjectCreationFailure);
    assert!(err.log.is_empty());
    assert_eq!(ctx.shaders_created(), 0);
}

#[test]
fn test_fragment_object_creation_failure_deletes_vertex() {
    let ctx = HeadlessContext::new();
    ctx.fail_allocations_after(1);

    let err = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap_err();
    assert_eq!(err.kind, BuildErrorKind::ObjectCreationFailure);
    assert_eq!(ctx.shaders_created(), 1);
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_program_object_creation_failure_deletes_shaders() {
    let ctx = HeadlessContext::new();
    ctx.fail_allocations_after(2);

    let err = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap_err();
    assert_eq!(err.kind, BuildErrorKind::ObjectCreationFailure);
    assert_eq!(ctx.shaders_created(), 2);
    assert_eq!(ctx.programs_created(), 0);
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn test_lost_context_fails_with_object_creation() {
    let ctx = HeadlessContext::new();
    ctx.lose_context();

    let err = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap_err();
    assert_eq!(err.kind, BuildErrorKind::ObjectCreationFailure);

    ctx.restore_context();
    assert!(ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).is_ok());
}

// ============================================================================
// Single stage
// ============================================================================

#[test]
fn test_compile_single_stage() {
    let ctx = HeadlessContext::new();
    let shader = ShaderProgramBuilder::compile(&ctx, &ShaderSource::fragment(FRAGMENT)).unwrap();

    assert!(ctx.shader_compile_status(&shader));
    assert_eq!(ctx.live_shaders(), 1);
}

#[test]
fn test_compile_rejects_stage_mismatch() {
    let ctx = HeadlessContext::new();
    // gl_FragColor does not exist in a vertex shader
    let err = ShaderProgramBuilder::compile(&ctx, &ShaderSource::vertex(FRAGMENT)).unwrap_err();

    assert_eq!(err.kind, BuildErrorKind::CompileFailure);
    assert!(err.log.contains("gl_FragColor"));
}

// ============================================================================
// Error display
// ============================================================================

#[test]
fn test_build_error_display() {
    let compile = BuildError::new(BuildErrorKind::CompileFailure, "ERROR: 0:1: 'x' : syntax error");
    assert_eq!(
        compile.to_string(),
        "Failed to compile a shader\nERROR: 0:1: 'x' : syntax error"
    );

    let creation = BuildError::new(BuildErrorKind::ObjectCreationFailure, "");
    assert_eq!(creation.to_string(), "Failed to create a GL object");
}

// ============================================================================
// ShaderProgram wrapper
// ============================================================================

#[test]
fn test_shader_program_bind_and_lookup() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgram::build(&ctx, SHAPE_VERTEX, SHAPE_FRAGMENT).unwrap();

    program.bind(&ctx);
    assert_eq!(ctx.current_program(), Some(*program.inner()));
    assert_eq!(program.attrib(&ctx, "position"), Some(0));
    assert!(program.uniform(&ctx, "u_color").is_some());
    assert!(program.uniform(&ctx, "u_missing").is_none());

    program.delete(&ctx);
    assert_eq!(ctx.live_programs(), 0);
    assert_eq!(ctx.current_program(), None);
}
