//! Rendering - SVG preview and OpenSCAD solid from part geometry

pub mod template;

pub use template::{TemplateError, TemplateGenerator};
