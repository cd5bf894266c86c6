//! partsmith: turn short engineering requests into parametric parts
//!
//! A prompt is interpreted into a fully resolved part spec, built into a 2D
//! preview and an extruded solid, checked with a first-order structural
//! estimate, and recorded in an append-only run log.

pub mod cli;
pub mod core;
pub mod entities;
pub mod interpret;
pub mod render;
pub mod yaml;
