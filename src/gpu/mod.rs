// GPU module - organizes all WebGL-related functionality
// This module provides abstractions for WebGL operations including:
// - Context seam (GlContext) and canvas acquisition
// - Shader program building
// - Shader sources
// - Shape, dot and grid renderers
// - A headless context for running everything without a browser
// - Utility functions for common context operations

pub mod context;
pub mod dot;
pub mod grid;
pub mod headless;
pub mod pipeline;
pub mod shaders;
pub mod shapes;
pub mod utils;
