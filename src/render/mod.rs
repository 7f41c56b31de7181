//! Rendering module for converting extracted records to output formats.

mod json;
mod text;

pub use json::{pages_to_json, to_json, JsonFormat};
pub use text::to_text;
