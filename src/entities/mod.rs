//! Entity type definitions
//!
//! partsmith works with three value types, each produced by one pipeline stage:
//!
//! - [`PartSpec`] - Resolved part description (archetype, dimensions, material, load)
//! - [`PartGeometry`] - 2D preview outline and extruded solid sharing one hole layout
//! - [`StructuralReport`] - Mass, load capacity and PASS/FAIL verdict

pub mod geometry;
pub mod part;
pub mod structural;

pub use geometry::{GeometryError, Geometry2D, Hole, Outline, PartGeometry, SolidModel};
pub use part::{Material, PartSpec, PartType, Shape};
pub use structural::{StructuralReport, Verdict};
