//! Geometry construction - 2D preview outline and extruded solid model
//!
//! Both projections are built from one [`hole_layout`] call, so the preview
//! and the solid always reference identical hole coordinates.

use miette::Diagnostic;
use serde::Serialize;
use std::f64::consts::PI;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::entities::part::{PartSpec, Shape};

/// How far a through-cut pokes out of each face of the base solid
pub const HOLE_OVERSHOOT_MM: f64 = 1.0;

/// Segment count used to tessellate round outlines in the solid model
pub const CIRCLE_SEGMENTS: u32 = 128;

/// Fatal geometry construction errors
#[derive(Debug, Error, Diagnostic)]
pub enum GeometryError {
    #[error("Unknown part type: {0}")]
    #[diagnostic(
        code(partsmith::geometry::unknown_part_type),
        help("Valid part types: trapezoid (or arm), rectangle, circle, l_bracket")
    )]
    UnknownPartType(String),

    #[error("Degenerate {part_type} geometry: {reason}")]
    #[diagnostic(code(partsmith::geometry::degenerate))]
    Degenerate { part_type: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A round through hole, located in the part's XY plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hole {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Closed 2D boundary of the part
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outline {
    /// Counter-clockwise vertex loop; the closing edge is implicit
    Polygon { points: Vec<Point2> },
    /// Disk centered on the origin
    Circle { radius: f64 },
}

impl Outline {
    fn rectangle(length: f64, width: f64) -> Self {
        Outline::Polygon {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(length, 0.0),
                Point2::new(length, width),
                Point2::new(0.0, width),
            ],
        }
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn bounds(&self) -> (Point2, Point2) {
        match self {
            Outline::Polygon { points } => {
                let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
                let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
                for p in points {
                    min.x = min.x.min(p.x);
                    min.y = min.y.min(p.y);
                    max.x = max.x.max(p.x);
                    max.y = max.y.max(p.y);
                }
                (min, max)
            }
            Outline::Circle { radius } => (
                Point2::new(-radius, -radius),
                Point2::new(*radius, *radius),
            ),
        }
    }
}

/// Top-view projection used for the preview image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry2D {
    pub outline: Outline,
    pub holes: Vec<Hole>,
}

/// Axis-aligned box given by its minimum corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cuboid {
    pub origin: [f64; 3],
    pub size: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolidBase {
    /// Outline swept from z = 0 to z = height
    Extrusion {
        outline: Outline,
        height: f64,
        segments: u32,
    },
    /// Union of boxes
    BoxUnion { boxes: Vec<Cuboid> },
}

/// A hole subtracted through the full thickness of the base
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughCut {
    pub hole: Hole,
    pub z_start: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolidModel {
    pub base: SolidBase,
    pub cuts: Vec<ThroughCut>,
}

/// Both projections of one part
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartGeometry {
    pub preview: Geometry2D,
    pub solid: SolidModel,
}

/// Build the preview and the solid for a resolved spec
#[instrument(skip(spec), fields(part_type = %spec.part_type()))]
pub fn build(spec: &PartSpec) -> Result<PartGeometry, GeometryError> {
    validate(spec)?;
    let holes = hole_layout(spec);
    debug!(holes = holes.len(), "placed holes");

    let preview = Geometry2D {
        outline: outline(spec),
        holes: holes.clone(),
    };
    let solid = SolidModel {
        base: solid_base(spec),
        cuts: through_cuts(&holes, spec.thickness_mm as f64),
    };

    Ok(PartGeometry { preview, solid })
}

impl Geometry2D {
    pub fn from_spec(spec: &PartSpec) -> Result<Self, GeometryError> {
        validate(spec)?;
        Ok(Self {
            outline: outline(spec),
            holes: hole_layout(spec),
        })
    }
}

impl SolidModel {
    pub fn from_spec(spec: &PartSpec) -> Result<Self, GeometryError> {
        validate(spec)?;
        Ok(Self {
            base: solid_base(spec),
            cuts: through_cuts(&hole_layout(spec), spec.thickness_mm as f64),
        })
    }
}

fn degenerate(spec: &PartSpec, reason: impl Into<String>) -> GeometryError {
    GeometryError::Degenerate {
        part_type: spec.part_type().to_string(),
        reason: reason.into(),
    }
}

/// Reject specs that cannot produce a solid, before anything is allocated
fn validate(spec: &PartSpec) -> Result<(), GeometryError> {
    if spec.length_mm == 0 {
        return Err(degenerate(spec, "length must be positive"));
    }
    if spec.thickness_mm == 0 {
        return Err(degenerate(spec, "thickness must be positive"));
    }
    if spec.hole_diameter_mm == 0 {
        return Err(degenerate(spec, "hole diameter must be positive"));
    }

    match spec.shape {
        Shape::Trapezoid {
            width_left_mm,
            width_right_mm,
        } if width_left_mm == 0 || width_right_mm == 0 => {
            return Err(degenerate(spec, "both end widths must be positive"))
        }
        Shape::Rectangle { rect_width_mm: 0 } => {
            return Err(degenerate(spec, "width must be positive"))
        }
        Shape::Circle {
            circle_diameter_mm: 0,
        } => return Err(degenerate(spec, "diameter must be positive")),
        Shape::LBracket { width_mm, .. } if width_mm == 0 => {
            return Err(degenerate(spec, "width must be positive"))
        }
        Shape::LBracket {
            flange_height_mm: 0,
            ..
        } => return Err(degenerate(spec, "flange height must be positive")),
        Shape::LBracket { .. } if spec.length_mm <= spec.thickness_mm => {
            return Err(degenerate(spec, "length must exceed the leg thickness"))
        }
        _ => {}
    }

    if spec.hole_count > 0 && hole_pitch(spec) < spec.hole_diameter_mm as f64 {
        return Err(degenerate(
            spec,
            format!(
                "{} holes of {} mm do not fit",
                spec.hole_count, spec.hole_diameter_mm
            ),
        ));
    }
    Ok(())
}

/// Centre-to-centre spacing of neighbouring holes
fn hole_pitch(spec: &PartSpec) -> f64 {
    let count = spec.hole_count as f64;
    match spec.shape {
        Shape::Circle { circle_diameter_mm } => {
            if spec.hole_count == 1 {
                return f64::INFINITY;
            }
            let ring = ring_radius(circle_diameter_mm);
            2.0 * ring * (PI / count).sin()
        }
        _ => linear_span(spec) / (count + 1.0),
    }
}

fn linear_span(spec: &PartSpec) -> f64 {
    match spec.shape {
        Shape::LBracket { .. } => spec.length_mm as f64 - spec.thickness_mm as f64,
        _ => spec.length_mm as f64,
    }
}

fn ring_radius(circle_diameter_mm: u32) -> f64 {
    0.5 * circle_diameter_mm as f64 / 2.0
}

fn outline(spec: &PartSpec) -> Outline {
    let length = spec.length_mm as f64;
    match spec.shape {
        Shape::Trapezoid {
            width_left_mm,
            width_right_mm,
        } => Outline::Polygon {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(length, 0.0),
                Point2::new(length, width_right_mm as f64),
                Point2::new(0.0, width_left_mm as f64),
            ],
        },
        Shape::Rectangle { rect_width_mm } => Outline::rectangle(length, rect_width_mm as f64),
        Shape::Circle { circle_diameter_mm } => Outline::Circle {
            radius: circle_diameter_mm as f64 / 2.0,
        },
        // Top view of the base leg; the flange stands on its far edge.
        Shape::LBracket { width_mm, .. } => Outline::rectangle(length, width_mm as f64),
    }
}

fn solid_base(spec: &PartSpec) -> SolidBase {
    let length = spec.length_mm as f64;
    let thickness = spec.thickness_mm as f64;
    match spec.shape {
        Shape::LBracket {
            width_mm,
            flange_height_mm,
        } => {
            let width = width_mm as f64;
            SolidBase::BoxUnion {
                boxes: vec![
                    Cuboid {
                        origin: [0.0, 0.0, 0.0],
                        size: [length, width, thickness],
                    },
                    Cuboid {
                        origin: [length - thickness, 0.0, 0.0],
                        size: [thickness, width, flange_height_mm as f64],
                    },
                ],
            }
        }
        _ => SolidBase::Extrusion {
            outline: outline(spec),
            height: thickness,
            segments: CIRCLE_SEGMENTS,
        },
    }
}

/// Hole placement shared by the preview and the solid model
pub fn hole_layout(spec: &PartSpec) -> Vec<Hole> {
    let count = spec.hole_count;
    let radius = spec.hole_diameter_mm as f64 / 2.0;
    let span = linear_span(spec);

    match spec.shape {
        // Midline of the mean width, constant along the taper
        Shape::Trapezoid {
            width_left_mm,
            width_right_mm,
        } => {
            let y = (width_left_mm as f64 + width_right_mm as f64) / 4.0;
            linear_holes(count, span, y, radius)
        }
        Shape::Rectangle { rect_width_mm } => {
            linear_holes(count, span, rect_width_mm as f64 / 2.0, radius)
        }
        Shape::Circle { circle_diameter_mm } => {
            ring_holes(count, ring_radius(circle_diameter_mm), radius)
        }
        // Holes stay on the base leg, clear of the flange
        Shape::LBracket { width_mm, .. } => {
            linear_holes(count, span, width_mm as f64 / 2.0, radius)
        }
    }
}

fn linear_holes(count: u32, span: f64, y: f64, radius: f64) -> Vec<Hole> {
    let pitch = span / (count as f64 + 1.0);
    (1..=count)
        .map(|i| Hole {
            x: i as f64 * pitch,
            y,
            radius,
        })
        .collect()
}

fn ring_holes(count: u32, ring_radius: f64, radius: f64) -> Vec<Hole> {
    (0..count)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / count as f64;
            Hole {
                x: ring_radius * angle.cos(),
                y: ring_radius * angle.sin(),
                radius,
            }
        })
        .collect()
}

fn through_cuts(holes: &[Hole], thickness: f64) -> Vec<ThroughCut> {
    holes
        .iter()
        .map(|&hole| ThroughCut {
            hole,
            z_start: -HOLE_OVERSHOOT_MM,
            depth: thickness + 2.0 * HOLE_OVERSHOOT_MM,
        })
        .collect()
}
