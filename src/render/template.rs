//! Preview and solid-model rendering from embedded templates

use rust_embed::Embed;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::entities::geometry::{Geometry2D, Outline, Point2, SolidBase, SolidModel};

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const PREVIEW_TEMPLATE: &str = "preview.svg.tera";
const SCAD_TEMPLATE: &str = "part.scad.tera";

/// Blank border around the outline in the preview, in mm
pub const PREVIEW_MARGIN_MM: f64 = 10.0;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Renders part geometry to SVG and OpenSCAD text
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Serialize)]
struct OutlineView {
    kind: &'static str,
    radius: String,
    points: String,
}

#[derive(Serialize)]
struct CircleView {
    x: String,
    y: String,
    r: String,
}

#[derive(Serialize)]
struct BoxView {
    origin: String,
    size: String,
}

#[derive(Serialize)]
struct BaseView {
    kind: &'static str,
    height: String,
    radius: String,
    segments: u32,
    points: String,
    boxes: Vec<BoxView>,
}

#[derive(Serialize)]
struct CutView {
    x: String,
    y: String,
    z: String,
    depth: String,
    r: String,
}

impl TemplateGenerator {
    /// Create a generator with the embedded templates loaded
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Top-view SVG: outline in light grey, holes in white, y axis pointing up
    pub fn render_preview(&self, geometry: &Geometry2D) -> Result<String, TemplateError> {
        let (min, max) = geometry.outline.bounds();
        let width = max.x - min.x + 2.0 * PREVIEW_MARGIN_MM;
        let height = max.y - min.y + 2.0 * PREVIEW_MARGIN_MM;

        // The drawing group is mirrored in y, so the view box is too
        let view_min_x = min.x - PREVIEW_MARGIN_MM;
        let view_min_y = -(max.y + PREVIEW_MARGIN_MM);

        let mut context = Context::new();
        context.insert("width", &fmt_num(width));
        context.insert("height", &fmt_num(height));
        context.insert("min_x", &fmt_num(view_min_x));
        context.insert("min_y", &fmt_num(view_min_y));
        context.insert(
            "view_box",
            &format!(
                "{} {} {} {}",
                fmt_num(view_min_x),
                fmt_num(view_min_y),
                fmt_num(width),
                fmt_num(height)
            ),
        );
        context.insert("stroke", &fmt_num((width.max(height) / 300.0).max(0.2)));
        context.insert("outline", &outline_view(&geometry.outline));

        let holes: Vec<CircleView> = geometry
            .holes
            .iter()
            .map(|h| CircleView {
                x: fmt_num(h.x),
                y: fmt_num(h.y),
                r: fmt_num(h.radius),
            })
            .collect();
        context.insert("holes", &holes);

        self.render(PREVIEW_TEMPLATE, &context)
    }

    /// OpenSCAD source: the base solid minus a union of through-cuts
    pub fn render_scad(&self, solid: &SolidModel) -> Result<String, TemplateError> {
        let mut context = Context::new();
        context.insert("base", &base_view(&solid.base));

        let cuts: Vec<CutView> = solid
            .cuts
            .iter()
            .map(|c| CutView {
                x: fmt_num(c.hole.x),
                y: fmt_num(c.hole.y),
                z: fmt_num(c.z_start),
                depth: fmt_num(c.depth),
                r: fmt_num(c.hole.radius),
            })
            .collect();
        context.insert("cuts", &cuts);

        self.render(SCAD_TEMPLATE, &context)
    }

    fn render(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.tera
            .render(name, context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

fn outline_view(outline: &Outline) -> OutlineView {
    match outline {
        Outline::Circle { radius } => OutlineView {
            kind: "circle",
            radius: fmt_num(*radius),
            points: String::new(),
        },
        Outline::Polygon { points } => OutlineView {
            kind: "polygon",
            radius: String::new(),
            points: points
                .iter()
                .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
                .collect::<Vec<_>>()
                .join(" "),
        },
    }
}

fn base_view(base: &SolidBase) -> BaseView {
    let mut view = BaseView {
        kind: "polygon",
        height: String::new(),
        radius: String::new(),
        segments: 0,
        points: String::new(),
        boxes: Vec::new(),
    };

    match base {
        SolidBase::Extrusion {
            outline,
            height,
            segments,
        } => {
            view.height = fmt_num(*height);
            match outline {
                Outline::Circle { radius } => {
                    view.kind = "circle";
                    view.radius = fmt_num(*radius);
                    view.segments = *segments;
                }
                Outline::Polygon { points } => view.points = scad_points(points),
            }
        }
        SolidBase::BoxUnion { boxes } => {
            view.kind = "box_union";
            view.boxes = boxes
                .iter()
                .map(|b| BoxView {
                    origin: scad_vector(&b.origin),
                    size: scad_vector(&b.size),
                })
                .collect();
        }
    }

    view
}

fn scad_points(points: &[Point2]) -> String {
    points
        .iter()
        .map(|p| format!("[{}, {}]", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn scad_vector(v: &[f64; 3]) -> String {
    v.iter().map(|c| fmt_num(*c)).collect::<Vec<_>>().join(", ")
}

/// Shortest decimal form with at most three fraction digits
pub fn fmt_num(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
