//! YAML loading with source-located diagnostics

pub mod diagnostics;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

use crate::entities::{PartSpec, PartType};
pub use diagnostics::{YamlError, YamlSyntaxError};

/// Parse a YAML document, attributing errors to `filename`
pub fn parse_yaml_str<T: DeserializeOwned + 'static>(source: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(source)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename).into())
}

/// Parse a part spec document
///
/// The part type is checked before the rest of the document so that an
/// unrecognized archetype is reported as such rather than as a shape error.
pub fn parse_part_spec(source: &str, filename: &str) -> Result<PartSpec, YamlError> {
    let document: serde_yml::Value = parse_yaml_str(source, filename)?;

    let part_type = document
        .get("shape")
        .and_then(|shape| shape.get("part_type"))
        .and_then(|value| value.as_str());
    if let Some(part_type) = part_type {
        PartType::from_str(part_type)?;
    }

    parse_yaml_str(source, filename)
}

/// Load a part spec file
pub fn load_part_spec(path: &Path) -> Result<PartSpec, YamlError> {
    let source = read_source(path)?;
    parse_part_spec(&source, &path.display().to_string())
}

pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, YamlError> {
    serde_yml::to_string(value).map_err(|e| YamlError::Serialize(e.to_string()))
}

fn read_source(path: &Path) -> Result<String, YamlError> {
    std::fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GeometryError, Material, Shape};

    const RECTANGLE: &str = r#"
shape:
  part_type: rectangle
  rect_width_mm: 30
length_mm: 200
thickness_mm: 5
hole_count: 2
hole_diameter_mm: 6
material: steel
target_force_n: 2000
"#;

    #[test]
    fn test_parse_part_spec() {
        let spec = parse_part_spec(RECTANGLE, "bar.yaml").unwrap();
        assert_eq!(spec.shape, Shape::Rectangle { rect_width_mm: 30 });
        assert_eq!(spec.length_mm, 200);
        assert_eq!(spec.material, Material::Steel);
    }

    #[test]
    fn test_unknown_part_type_is_reported_as_such() {
        let source = RECTANGLE.replace("part_type: rectangle", "part_type: hexagon");
        let err = parse_part_spec(&source, "bad.yaml").unwrap_err();
        match err {
            YamlError::Geometry(GeometryError::UnknownPartType(name)) => assert_eq!(name, "hexagon"),
            other => panic!("expected unknown part type, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_a_located_error() {
        let source = RECTANGLE.replace("length_mm: 200\n", "");
        let err = parse_part_spec(&source, "short.yaml").unwrap_err();
        match err {
            YamlError::Syntax(e) => assert!(e.message().contains("length_mm")),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse_part_spec("shape: [unclosed", "broken.yaml").unwrap_err();
        assert!(matches!(err, YamlError::Syntax(_)));
    }

    #[test]
    fn test_load_and_write_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bar.yaml");
        let spec = parse_part_spec(RECTANGLE, "bar.yaml").unwrap();

        std::fs::write(&path, to_yaml(&spec).unwrap()).unwrap();
        assert_eq!(load_part_spec(&path).unwrap(), spec);
    }

    #[test]
    fn test_missing_file() {
        let err = load_part_spec(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, YamlError::Io { .. }));
    }
}
