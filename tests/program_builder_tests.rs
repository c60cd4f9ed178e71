//! Builds shader programs through the public API against the headless context.

use webgl_sketches::gpu::context::{DrawMode, GlContext};
use webgl_sketches::gpu::headless::HeadlessContext;
use webgl_sketches::gpu::pipeline::{BuildErrorKind, ShaderProgramBuilder};

const VERTEX: &str = r#"
void main() {
    gl_Position = vec4(0.0, 0.0, 0.0, 1.0);
    gl_PointSize = 10.0;
}
"#;

const FRAGMENT: &str = r#"
precision mediump float;
void main() {
    gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0);
}
"#;

#[test]
fn point_program_builds_and_draws() {
    let ctx = HeadlessContext::new();
    let program = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap();

    ctx.use_program(Some(&program));
    ctx.draw_arrays(DrawMode::Points, 0, 1);

    assert!(ctx.program_link_status(&program));
    assert_eq!(ctx.error(), None);
}

#[test]
fn compile_errors_carry_the_compiler_log() {
    let ctx = HeadlessContext::new();
    let err = ShaderProgramBuilder::build(&ctx, "this is not glsl", FRAGMENT).unwrap_err();

    assert_eq!(err.kind, BuildErrorKind::CompileFailure);
    assert!(err.log.contains("syntax error"));
    assert!(err.to_string().starts_with("Failed to compile a shader"));
}

#[test]
fn no_objects_leak_on_any_failure() {
    let cases = [
        ("this is not glsl", FRAGMENT),
        (VERTEX, "void main() {"),
        (VERTEX, "precision mediump float;\nvarying vec2 v_uv;\nvoid main() { gl_FragColor = vec4(v_uv, 0.0, 1.0); }"),
    ];

    for (vertex, fragment) in cases {
        let ctx = HeadlessContext::new();
        assert!(ShaderProgramBuilder::build(&ctx, vertex, fragment).is_err());
        assert_eq!(ctx.live_shaders(), 0, "{vertex} / {fragment}");
        assert_eq!(ctx.live_programs(), 0, "{vertex} / {fragment}");
    }
}

#[test]
fn successful_builds_leave_no_undeleted_shaders() {
    let ctx = HeadlessContext::new();
    let programs: Vec<_> = (0..3)
        .map(|_| ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap())
        .collect();

    assert_eq!(ctx.undeleted_shaders(), 0);
    for program in &programs {
        ctx.delete_program(program);
    }
    assert_eq!(ctx.live_shaders(), 0);
}

#[test]
fn allocation_failure_at_every_step() {
    for budget in 0..3 {
        let ctx = HeadlessContext::new();
        ctx.fail_allocations_after(budget);

        let err = ShaderProgramBuilder::build(&ctx, VERTEX, FRAGMENT).unwrap_err();
        assert_eq!(err.kind, BuildErrorKind::ObjectCreationFailure, "budget {budget}");
        assert_eq!(ctx.live_shaders(), 0, "budget {budget}");
    }
}
