//! Error types for sketch setup.
//!
//! Shader builds report their own [`BuildError`]; everything that can go wrong
//! around them (acquiring a context, reading configuration, parsing colors)
//! is folded into [`SketchError`].

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::gpu::pipeline::BuildError;

pub type SketchResult<T> = Result<T, SketchError>;

#[derive(Debug, Error)]
pub enum SketchError {
    /// The canvas could not provide a webgl2 context.
    #[error("WebGL 2.0 context is unavailable")]
    ContextUnavailable,

    /// A required DOM element is missing or has the wrong type.
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// The context refused to allocate a buffer.
    #[error("Failed to create a buffer")]
    BufferCreation,

    /// A linked program does not expose an attribute the sketch feeds.
    #[error("Attribute `{0}` is not active in the program")]
    MissingAttribute(String),

    /// The context reported an error code after a sketch issued commands.
    #[error("GL error 0x{code:04x} during {during}")]
    Gl { code: u32, during: &'static str },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid color `{0}`, expected #rrggbb")]
    InvalidColor(String),

    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for SketchError {
    fn from(value: JsValue) -> Self {
        SketchError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
