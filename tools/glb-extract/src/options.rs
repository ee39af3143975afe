//! Per-export configuration

use crate::mesh::{COLOR, NORMAL, POSITION, TEX_COORDS};
use gltf_json::mesh::Mode;
use hashbrown::HashMap;
use std::path::PathBuf;

/// Default alias -> glTF semantic mapping
pub fn default_attribute_map() -> HashMap<String, String> {
    [
        (COLOR, "COLOR_0"),
        (POSITION, "POSITION"),
        (NORMAL, "NORMAL"),
        (TEX_COORDS, "TEXCOORD_0"),
    ]
    .into_iter()
    .map(|(alias, semantic)| (alias.to_string(), semantic.to_string()))
    .collect()
}

/// Timestamped output file in the working directory
pub fn default_output_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d %H-%M-%S");
    PathBuf::from(format!("glb-extract {stamp}.glb"))
}

/// Every primitive mode, in GL enum order
pub const MODES: [Mode; 7] = [
    Mode::Points,
    Mode::Lines,
    Mode::LineLoop,
    Mode::LineStrip,
    Mode::Triangles,
    Mode::TriangleStrip,
    Mode::TriangleFan,
];

/// Parse a primitive mode from a name (`triangles`, `line-strip`, ...) or GL value
pub fn parse_mode(s: &str) -> Option<Mode> {
    if let Ok(code) = s.parse::<u32>() {
        return MODES.into_iter().find(|mode| mode.as_gl_enum() == code);
    }
    Some(match s.to_ascii_lowercase().replace('_', "-").as_str() {
        "points" => Mode::Points,
        "lines" => Mode::Lines,
        "line-loop" => Mode::LineLoop,
        "line-strip" => Mode::LineStrip,
        "triangles" => Mode::Triangles,
        "triangle-strip" => Mode::TriangleStrip,
        "triangle-fan" => Mode::TriangleFan,
        _ => return None,
    })
}

/// Options for a single export
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Destination file; must not exist yet
    pub output: PathBuf,
    pub render_mode: Mode,
    /// Attribute alias -> glTF semantic; unmapped aliases are written unchanged
    pub attribute_map: HashMap<String, String>,
    /// Alias of the attribute that gets min/max bounds
    pub position_alias: String,
    /// Optional `asset.generator` string
    pub generator: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output: default_output_path(),
            render_mode: Mode::Triangles,
            attribute_map: default_attribute_map(),
            position_alias: POSITION.to_string(),
            generator: None,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_render_mode(mut self, mode: Mode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Map an attribute alias to a glTF semantic (replaces any existing mapping)
    pub fn with_attribute(mut self, alias: impl Into<String>, semantic: impl Into<String>) -> Self {
        self.attribute_map.insert(alias.into(), semantic.into());
        self
    }

    pub fn with_position_alias(mut self, alias: impl Into<String>) -> Self {
        self.position_alias = alias.into();
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// glTF attribute name for `alias`
    pub fn semantic_for<'a>(&'a self, alias: &'a str) -> &'a str {
        self.attribute_map
            .get(alias)
            .map(String::as_str)
            .unwrap_or(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let options = ExtractOptions::default();
        assert_eq!(options.semantic_for("position"), "POSITION");
        assert_eq!(options.semantic_for("color"), "COLOR_0");
        assert_eq!(options.semantic_for("normal"), "NORMAL");
        assert_eq!(options.semantic_for("texCoords"), "TEXCOORD_0");
        assert_eq!(options.semantic_for("_BONE_ID"), "_BONE_ID");
        assert_eq!(options.render_mode.as_gl_enum(), 4);
        assert_eq!(options.position_alias, "position");
    }

    #[test]
    fn test_override_mapping() {
        let options = ExtractOptions::new()
            .with_attribute("texCoords", "TEXCOORD_1")
            .with_attribute("a_tangent", "TANGENT");
        assert_eq!(options.semantic_for("texCoords"), "TEXCOORD_1");
        assert_eq!(options.semantic_for("a_tangent"), "TANGENT");
    }

    #[test]
    fn test_default_output_name() {
        let name = default_output_path();
        let name = name.to_str().unwrap();
        assert!(name.starts_with("glb-extract "));
        assert!(name.ends_with(".glb"));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("triangles").map(|mode| mode.as_gl_enum()), Some(4));
        assert_eq!(parse_mode("LINE_STRIP").map(|mode| mode.as_gl_enum()), Some(3));
        assert_eq!(parse_mode("triangle-fan").map(|mode| mode.as_gl_enum()), Some(6));
        assert_eq!(parse_mode("0").map(|mode| mode.as_gl_enum()), Some(0));
        assert!(parse_mode("quads").is_none());
        assert!(parse_mode("7").is_none());
    }
}
