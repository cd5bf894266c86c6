//! Structural estimate - mass and a first-order load capacity check
//!
//! The load capacity is `yield strength × critical section`, where the
//! critical section is the narrowest width across the load path times the
//! plate thickness. Yield strength is in MPa, i.e. N/mm², so no unit
//! conversion is applied against an area in mm².

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{info, instrument};

use crate::entities::part::{PartSpec, Shape};

/// Outcome of comparing capacity against the requested load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Mass and strength figures for one part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Plan area used for the volume estimate
    pub net_area_mm2: f64,

    /// Narrowest cross-section carrying the load
    pub min_section_mm2: f64,

    pub volume_cm3: f64,
    pub weight_g: f64,

    /// Force at which the critical section reaches yield
    pub max_force_n: f64,

    pub target_force_n: u32,
    pub status: Verdict,
}

impl StructuralReport {
    /// Estimate mass and capacity for a resolved spec
    #[instrument(skip(spec), fields(part_type = %spec.part_type(), material = %spec.material))]
    pub fn estimate(spec: &PartSpec) -> Self {
        let thickness = spec.thickness_mm as f64;
        let net_area_mm2 = net_area_mm2(spec);
        let volume_cm3 = net_area_mm2 * thickness / 1000.0;
        let weight_g = volume_cm3 * spec.material.density_g_cm3();

        let min_section_mm2 = spec.shape.min_width_mm() as f64 * thickness;
        let max_force_n = spec.material.yield_strength_mpa() * min_section_mm2;

        let status = if max_force_n >= spec.target_force_n as f64 {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        info!(net_area_mm2, weight_g, max_force_n, %status, "structural estimate");

        Self {
            net_area_mm2,
            min_section_mm2,
            volume_cm3,
            weight_g,
            max_force_n,
            target_force_n: spec.target_force_n,
            status,
        }
    }

    /// Capacity over requested load
    pub fn safety_factor(&self) -> f64 {
        if self.target_force_n == 0 {
            f64::INFINITY
        } else {
            self.max_force_n / self.target_force_n as f64
        }
    }
}

/// Plan area of the part, holes not deducted
pub fn net_area_mm2(spec: &PartSpec) -> f64 {
    let length = spec.length_mm as f64;
    match spec.shape {
        Shape::Trapezoid {
            width_left_mm,
            width_right_mm,
        } => 0.5 * (width_left_mm as f64 + width_right_mm as f64) * length,
        Shape::Rectangle { rect_width_mm } => length * rect_width_mm as f64,
        Shape::Circle { circle_diameter_mm } => {
            let r = circle_diameter_mm as f64 / 2.0;
            PI * r * r
        }
        // Base leg plus the part of the flange rising above it
        Shape::LBracket {
            width_mm,
            flange_height_mm,
        } => {
            let rise = flange_height_mm.saturating_sub(spec.thickness_mm) as f64;
            width_mm as f64 * (length + rise)
        }
    }
}
