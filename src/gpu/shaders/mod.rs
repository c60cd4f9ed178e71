// Shader Sources
// GLSL ES sources used by the sketches
// Responsibilities:
// - Provide the dot, grid and flat-color shape shaders
// - Generate constant-color fragment shaders

/// Places a single point in the middle of the canvas.
pub const DOT_VERTEX: &str = r#"
void main() {
    gl_Position = vec4(0.0, 0.0, 0.0, 1.0);
    gl_PointSize = 10.0;
}
"#;

/// Passes a full-screen quad through untouched.
pub const GRID_VERTEX: &str = r#"
attribute vec4 position;
void main() {
    gl_Position = position;
}
"#;

/// Draws a line every `size` pixels and discards everything in between.
pub const GRID_FRAGMENT: &str = r#"
precision mediump float;
uniform float size;
void main() {
    if (
        mod(gl_FragCoord.x, size) < 1.0 ||
        mod(gl_FragCoord.y, size) < 1.0
    ) {
        gl_FragColor = vec4(0.0, 0.0, 0.0, 0.8);
    } else {
        discard;
    }
}
"#;

pub const SHAPE_VERTEX: &str = r#"
attribute vec2 position;
uniform vec2 u_offset;
uniform float u_point_size;
void main() {
    gl_Position = vec4(position + u_offset, 0.0, 1.0);
    gl_PointSize = u_point_size;
}
"#;

pub const SHAPE_FRAGMENT: &str = r#"
precision mediump float;
uniform vec4 u_color;
void main() {
    gl_FragColor = u_color;
}
"#;

pub struct ShaderManager;

impl ShaderManager {
    /// A fragment shader that paints every fragment with `color`.
    pub fn generate_color_fragment_shader(color: [f32; 4]) -> String {
        format!(
            r#"
precision mediump float;
void main() {{
    gl_FragColor = vec4({:?}, {:?}, {:?}, {:?});
}}
"#,
            color[0], color[1], color[2], color[3]
        )
    }
}

#[cfg(test)]
#[path = "shaders_tests.rs"]
mod tests;
