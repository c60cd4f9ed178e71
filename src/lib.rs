//! WebGL sketches rendered into Leptos components.
//!
//! The reusable part is [`gpu::pipeline::ShaderProgramBuilder`], which turns a
//! vertex/fragment source pair into a linked program against any
//! [`gpu::context::GlContext`]. The sketches (a dot, a paintable grid, a set of
//! shapes and an animated figure) are thin callers on top of it.

pub mod app;
pub mod config;
pub mod dot_sketch;
pub mod error;
pub mod gpu;
pub mod grid_sketch;
pub mod logging;
pub mod pixel_grid;
pub mod shapes_sketch;
