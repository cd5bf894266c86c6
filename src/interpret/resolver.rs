//! Part spec resolution
//!
//! Turns the raw fields pulled out of a prompt into a complete [`PartSpec`].
//! Resolution only fills fields that are absent; anything already present is
//! kept, which makes resolving a resolved spec a no-op.

use serde::{Deserialize, Serialize};

use crate::entities::part::{defaults, Material, PartSpec, PartType, Shape};

/// Raw prompt fields before archetype-specific derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRequest {
    pub part_type: PartType,
    pub length_mm: Option<u32>,
    pub width_mm: Option<u32>,
    /// Narrow-end width of a tapered part
    pub width_right_mm: Option<u32>,
    /// Explicit part diameter (round plates)
    pub diameter_mm: Option<u32>,
    pub flange_height_mm: Option<u32>,
    pub thickness_mm: Option<u32>,
    pub hole_count: Option<u32>,
    pub hole_diameter_mm: Option<u32>,
    pub material: Option<Material>,
    pub target_force_n: Option<u32>,
}

impl PartRequest {
    /// Request with only the archetype set
    pub fn new(part_type: PartType) -> Self {
        Self {
            part_type,
            length_mm: None,
            width_mm: None,
            width_right_mm: None,
            diameter_mm: None,
            flange_height_mm: None,
            thickness_mm: None,
            hole_count: None,
            hole_diameter_mm: None,
            material: None,
            target_force_n: None,
        }
    }

    /// Fill every absent field and derive the archetype's dimensions
    pub fn resolve(&self) -> PartSpec {
        let length = positive(self.length_mm).unwrap_or(defaults::LENGTH_MM);
        let width = positive(self.width_mm).unwrap_or(defaults::WIDTH_MM);
        let thickness = positive(self.thickness_mm).unwrap_or(defaults::THICKNESS_MM);

        let shape = match self.part_type {
            PartType::Trapezoid => Shape::Trapezoid {
                width_left_mm: width,
                width_right_mm: positive(self.width_right_mm).unwrap_or_else(|| tip_width(width)),
            },
            PartType::Rectangle => Shape::Rectangle {
                rect_width_mm: width,
            },
            PartType::Circle => Shape::Circle {
                circle_diameter_mm: positive(self.diameter_mm).unwrap_or(length),
            },
            PartType::LBracket => Shape::LBracket {
                width_mm: width,
                flange_height_mm: positive(self.flange_height_mm).unwrap_or(length / 2),
            },
        };

        // Only round plates have a part diameter; elsewhere a lone
        // "Nmm diameter" can only be describing the holes.
        let stray_diameter = match self.part_type {
            PartType::Circle => None,
            _ => positive(self.diameter_mm),
        };
        let hole_diameter = positive(self.hole_diameter_mm)
            .or(stray_diameter)
            .unwrap_or(defaults::HOLE_DIAMETER_MM);

        PartSpec {
            shape,
            length_mm: length,
            thickness_mm: thickness,
            hole_count: self.hole_count.unwrap_or(defaults::HOLE_COUNT),
            hole_diameter_mm: hole_diameter,
            material: self.material.unwrap_or_default(),
            target_force_n: self.target_force_n.unwrap_or(defaults::TARGET_FORCE_N),
        }
    }
}

impl From<&PartSpec> for PartRequest {
    /// Express a resolved spec as a request with every field present
    fn from(spec: &PartSpec) -> Self {
        let mut request = PartRequest::new(spec.part_type());
        request.length_mm = Some(spec.length_mm);
        request.thickness_mm = Some(spec.thickness_mm);
        request.hole_count = Some(spec.hole_count);
        request.hole_diameter_mm = Some(spec.hole_diameter_mm);
        request.material = Some(spec.material);
        request.target_force_n = Some(spec.target_force_n);

        match spec.shape {
            Shape::Trapezoid {
                width_left_mm,
                width_right_mm,
            } => {
                request.width_mm = Some(width_left_mm);
                request.width_right_mm = Some(width_right_mm);
            }
            Shape::Rectangle { rect_width_mm } => request.width_mm = Some(rect_width_mm),
            Shape::Circle { circle_diameter_mm } => request.diameter_mm = Some(circle_diameter_mm),
            Shape::LBracket {
                width_mm,
                flange_height_mm,
            } => {
                request.width_mm = Some(width_mm);
                request.flange_height_mm = Some(flange_height_mm);
            }
        }

        request
    }
}

/// Resolve an already-resolved spec; returns an identical spec
pub fn re_resolve(spec: &PartSpec) -> PartSpec {
    PartRequest::from(spec).resolve()
}

/// Default narrow-end width of a tapered part: half the wide end, never below 10 mm
pub fn tip_width(width_left_mm: u32) -> u32 {
    (width_left_mm / 2).max(defaults::MIN_TIP_WIDTH_MM)
}

fn positive(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}
