//! Part specification - the fully resolved description of a requested part
//!
//! A [`PartSpec`] is produced once per prompt and is the only input to both
//! geometry construction and structural estimation. The archetype tag lives
//! on [`Shape`], so the part type and its dimensions can never disagree.

use serde::{Deserialize, Serialize};

use crate::entities::geometry::GeometryError;

/// Built-in defaults used when a prompt does not mention a field
pub mod defaults {
    pub const LENGTH_MM: u32 = 120;
    pub const WIDTH_MM: u32 = 40;
    pub const THICKNESS_MM: u32 = 5;
    pub const HOLE_COUNT: u32 = 3;
    pub const HOLE_DIAMETER_MM: u32 = 6;
    pub const TARGET_FORCE_N: u32 = 2000;

    /// Narrowest tip a tapered arm is allowed to resolve to
    pub const MIN_TIP_WIDTH_MM: u32 = 10;
}

/// Supported part archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    /// Linearly tapered plate (also requested as "arm")
    #[serde(alias = "arm")]
    Trapezoid,
    /// Axis-aligned rectangular bar
    Rectangle,
    /// Round plate
    Circle,
    /// Base leg with an upstanding flange at the far end
    LBracket,
}

impl PartType {
    pub const ALL: [PartType; 4] = [
        PartType::Trapezoid,
        PartType::Rectangle,
        PartType::Circle,
        PartType::LBracket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::Trapezoid => "trapezoid",
            PartType::Rectangle => "rectangle",
            PartType::Circle => "circle",
            PartType::LBracket => "l_bracket",
        }
    }
}

impl std::fmt::Display for PartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PartType {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trapezoid" | "arm" => Ok(PartType::Trapezoid),
            "rectangle" => Ok(PartType::Rectangle),
            "circle" => Ok(PartType::Circle),
            "l_bracket" | "l-bracket" | "lbracket" => Ok(PartType::LBracket),
            _ => Err(GeometryError::UnknownPartType(s.to_string())),
        }
    }
}

/// Stock material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    #[serde(alias = "aluminium")]
    Aluminum,
    Steel,
}

impl Material {
    /// Density in g/cm³
    pub fn density_g_cm3(&self) -> f64 {
        match self {
            Material::Aluminum => 2.7,
            Material::Steel => 7.85,
        }
    }

    /// Yield strength in MPa (equivalently N/mm²)
    ///
    /// Aluminum is approximated as 6061-T6, steel as mild steel.
    pub fn yield_strength_mpa(&self) -> f64 {
        match self {
            Material::Aluminum => 150.0,
            Material::Steel => 250.0,
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Material::Aluminum => write!(f, "aluminum"),
            Material::Steel => write!(f, "steel"),
        }
    }
}

impl std::str::FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aluminum" | "aluminium" => Ok(Material::Aluminum),
            "steel" => Ok(Material::Steel),
            _ => Err(format!("Unknown material: {}. Use 'aluminum' or 'steel'", s)),
        }
    }
}

/// Archetype-specific dimensions, tagged by part type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "part_type", rename_all = "snake_case")]
pub enum Shape {
    #[serde(alias = "arm")]
    Trapezoid {
        /// Width at x = 0
        width_left_mm: u32,
        /// Width at x = length
        width_right_mm: u32,
    },
    Rectangle {
        rect_width_mm: u32,
    },
    Circle {
        circle_diameter_mm: u32,
    },
    LBracket {
        /// Extent of both legs across the bracket
        width_mm: u32,
        /// Height of the upstanding flange, measured from the underside of the base
        flange_height_mm: u32,
    },
}

impl Shape {
    pub fn part_type(&self) -> PartType {
        match self {
            Shape::Trapezoid { .. } => PartType::Trapezoid,
            Shape::Rectangle { .. } => PartType::Rectangle,
            Shape::Circle { .. } => PartType::Circle,
            Shape::LBracket { .. } => PartType::LBracket,
        }
    }

    /// Narrowest width across the load path, used for the critical section
    pub fn min_width_mm(&self) -> u32 {
        match *self {
            Shape::Trapezoid {
                width_left_mm,
                width_right_mm,
            } => width_left_mm.min(width_right_mm),
            Shape::Rectangle { rect_width_mm } => rect_width_mm,
            Shape::Circle { circle_diameter_mm } => circle_diameter_mm,
            Shape::LBracket { width_mm, .. } => width_mm,
        }
    }
}

/// Fully resolved part specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSpec {
    /// Archetype and its shape-specific dimensions
    pub shape: Shape,

    /// Primary extent along x
    pub length_mm: u32,

    /// Extrusion depth
    pub thickness_mm: u32,

    /// Number of through holes
    pub hole_count: u32,

    pub hole_diameter_mm: u32,

    pub material: Material,

    /// Load the part is expected to carry
    pub target_force_n: u32,
}

impl PartSpec {
    pub fn part_type(&self) -> PartType {
        self.shape.part_type()
    }
}
