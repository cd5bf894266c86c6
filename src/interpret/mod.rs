//! Prompt interpretation
//!
//! Free text goes in, a [`PartRequest`] with whatever could be recognized
//! comes out. Interpretation never fails: anything the rules do not find is
//! left absent and later filled with a default by [`PartRequest::resolve`].

pub mod lexer;
pub mod resolver;
pub mod rules;

use tracing::{debug, instrument};

use crate::entities::part::{PartSpec, PartType};
use lexer::Token;
use rules::{first_keyword, first_value, Rule};

pub use resolver::{re_resolve, tip_width, PartRequest};

/// Extract raw fields from a prompt
#[instrument(skip(prompt), fields(chars = prompt.len()))]
pub fn interpret(prompt: &str) -> PartRequest {
    let tokens = lexer::tokenize(prompt);

    let part_type = match first_keyword(rules::ARCHETYPE_RULES, &tokens) {
        Some((rule, part_type)) => {
            debug!(rule, %part_type, "matched archetype");
            part_type
        }
        None => PartType::Trapezoid,
    };

    let material = first_keyword(rules::MATERIAL_RULES, &tokens).map(|(rule, material)| {
        debug!(rule, %material, "matched material");
        material
    });

    let mut fields = Fields {
        tokens: &tokens,
        claimed: Vec::new(),
    };
    let length_mm = fields.take("length", rules::LENGTH_RULES);
    let width_right_mm = fields.take("width_right", rules::TIP_WIDTH_RULES);
    let diameter_mm = fields.take("diameter", rules::DIAMETER_RULES);
    let flange_height_mm = fields.take("flange_height", rules::FLANGE_RULES);
    let thickness_mm = fields.take("thickness", rules::THICKNESS_RULES);
    let hole_count = fields.take("hole_count", rules::HOLE_COUNT_RULES);
    let hole_diameter_mm = fields.take("hole_diameter", rules::HOLE_DIAMETER_RULES);
    let target_force_n = fields.take("target_force", rules::FORCE_RULES);
    // Last: its positional fallback only sees numbers nothing else took
    let width_mm = fields.take("width", rules::WIDTH_RULES);

    PartRequest {
        part_type,
        length_mm,
        width_mm,
        width_right_mm,
        diameter_mm,
        flange_height_mm,
        thickness_mm,
        hole_count,
        hole_diameter_mm,
        material,
        target_force_n,
    }
}

/// Interpret and resolve a prompt into a complete spec
pub fn parse(prompt: &str) -> PartSpec {
    interpret(prompt).resolve()
}

/// Numeric field extraction that tracks which tokens have been used
struct Fields<'a> {
    tokens: &'a [Token],
    claimed: Vec<usize>,
}

impl Fields<'_> {
    fn take(&mut self, name: &str, rules: &[Rule]) -> Option<u32> {
        let capture = first_value(rules, self.tokens, &self.claimed)?;
        debug!(field = name, rule = capture.rule, value = capture.value, "extracted");
        self.claimed.push(capture.token);
        Some(capture.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::part::{Material, Shape};

    #[test]
    fn test_suspension_arm_prompt() {
        let spec = parse(
            "Design an aluminum suspension arm 150mm long, 50mm wide, supports 2000N, 3-bolt mount",
        );
        assert_eq!(spec.part_type(), PartType::Trapezoid);
        assert_eq!(spec.length_mm, 150);
        assert_eq!(
            spec.shape,
            Shape::Trapezoid {
                width_left_mm: 50,
                width_right_mm: 25
            }
        );
        assert_eq!(spec.hole_count, 3);
        assert_eq!(spec.material, Material::Aluminum);
        assert_eq!(spec.target_force_n, 2000);
    }

    #[test]
    fn test_steel_plate_prompt() {
        let spec = parse("Make a steel plate 80mm diameter with 4 holes 6mm, thickness 6mm");
        assert_eq!(spec.part_type(), PartType::Circle);
        assert_eq!(
            spec.shape,
            Shape::Circle {
                circle_diameter_mm: 80
            }
        );
        assert_eq!(spec.hole_count, 4);
        assert_eq!(spec.hole_diameter_mm, 6);
        assert_eq!(spec.thickness_mm, 6);
        assert_eq!(spec.material, Material::Steel);
    }

    #[test]
    fn test_rectangle_bar_prompt() {
        let spec = parse("create a rectangle bar 200mm length and 30mm width with 2 bolt holes");
        assert_eq!(spec.part_type(), PartType::Rectangle);
        assert_eq!(spec.length_mm, 200);
        assert_eq!(spec.shape, Shape::Rectangle { rect_width_mm: 30 });
        assert_eq!(spec.hole_count, 2);
    }

    #[test]
    fn test_no_archetype_keyword_defaults_to_trapezoid() {
        for prompt in [
            "",
            "something sturdy",
            "a warm harmless widget 90mm",
            "barn door 3 holes",
            "steel 500mm long",
        ] {
            assert_eq!(
                interpret(prompt).part_type,
                PartType::Trapezoid,
                "prompt: {prompt:?}"
            );
        }
    }

    #[test]
    fn test_empty_prompt_resolves_to_defaults() {
        let spec = parse("");
        assert_eq!(spec.length_mm, 120);
        assert_eq!(
            spec.shape,
            Shape::Trapezoid {
                width_left_mm: 40,
                width_right_mm: 20
            }
        );
        assert_eq!(spec.thickness_mm, 5);
        assert_eq!(spec.hole_count, 3);
        assert_eq!(spec.hole_diameter_mm, 6);
    }

    #[test]
    fn test_l_bracket_prompt() {
        let spec = parse("L-bracket 100mm long, 40mm wide, 4mm thick, 2 holes");
        assert_eq!(spec.part_type(), PartType::LBracket);
        assert_eq!(
            spec.shape,
            Shape::LBracket {
                width_mm: 40,
                flange_height_mm: 50
            }
        );
        assert_eq!(spec.thickness_mm, 4);
        assert_eq!(spec.hole_count, 2);
    }

    #[test]
    fn test_tip_width_and_kilonewtons() {
        let spec = parse("steel arm 200mm long, 60mm wide, tip 40mm, supports 12kN");
        assert_eq!(
            spec.shape,
            Shape::Trapezoid {
                width_left_mm: 60,
                width_right_mm: 40
            }
        );
        assert_eq!(spec.target_force_n, 12_000);
    }

    #[test]
    fn test_default_tip_width_for_all_trapezoid_prompts() {
        for prompt in [
            "arm 150mm long, 50mm wide",
            "bracket 90mm, 15mm",
            "trapezoid 300mm by 120mm",
            "an arm",
        ] {
            match parse(prompt).shape {
                Shape::Trapezoid {
                    width_left_mm,
                    width_right_mm,
                } => assert_eq!(width_right_mm, std::cmp::max(10, width_left_mm / 2)),
                other => panic!("expected trapezoid for {prompt:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_one_number_fills_one_field() {
        let spec = parse("trapezoid 80mm by 150mm long");
        assert_eq!(spec.length_mm, 150);
        assert_eq!(
            spec.shape,
            Shape::Trapezoid {
                width_left_mm: 80,
                width_right_mm: 40
            }
        );

        // The thickness is not mistaken for the width
        let spec = parse("rectangle 200mm, 8mm thick, 50mm");
        assert_eq!(spec.length_mm, 200);
        assert_eq!(spec.thickness_mm, 8);
        assert_eq!(spec.shape, Shape::Rectangle { rect_width_mm: 50 });
    }

    #[test]
    fn test_saturated_width_estimates_without_overflow() {
        let spec = parse("arm 100mm long, 4000000000mm wide");
        assert_eq!(
            spec.shape,
            Shape::Trapezoid {
                width_left_mm: 4_000_000_000,
                width_right_mm: 2_000_000_000
            }
        );
        let geometry = crate::entities::geometry::build(&spec).unwrap();
        assert!(geometry.preview.holes.iter().all(|h| h.y == 1.5e9));

        let report = crate::entities::StructuralReport::estimate(&spec);
        assert_eq!(report.net_area_mm2, 0.5 * 6.0e9 * 100.0);
    }

    #[test]
    fn test_absurd_hole_count_is_rejected_not_allocated() {
        let spec = parse("arm 150mm long, 4294967295 holes");
        assert_eq!(spec.hole_count, u32::MAX);
        assert!(crate::entities::geometry::build(&spec).is_err());
    }

    #[test]
    fn test_parsed_specs_are_already_resolved() {
        for prompt in [
            "Design an aluminum suspension arm 150mm long, 50mm wide, supports 2000N, 3-bolt mount",
            "Make a steel plate 80mm diameter with 4 holes 6mm, thickness 6mm",
            "create a rectangle bar 200mm length and 30mm width with 2 bolt holes",
            "l bracket 8mm diameter holes",
        ] {
            let spec = parse(prompt);
            assert_eq!(re_resolve(&spec), spec);
        }
    }
}
