//! Configuration schema types for `t2s.toml`
//!
//! Every section is optional; missing keys take the defaults below.

use crate::normalizer::{MAX_CANVAS_DIM, MAX_SCENE_SHAPES};
use crate::renderer::ShapeStyle;
use crate::resolver::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Widest stroke accepted for single-shape renders
pub const MAX_STROKE: u32 = 64;

/// Single-shape render defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_dim")]
    pub width: u32,
    #[serde(default = "default_dim")]
    pub height: u32,
    #[serde(default = "default_stroke")]
    pub stroke: u32,
    /// Pen colour name or hex
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_dim() -> u32 {
    300
}

fn default_stroke() -> u32 {
    3
}

fn default_color() -> String {
    "black".to_string()
}

fn default_background() -> String {
    "white".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_dim(),
            height: default_dim(),
            stroke: default_stroke(),
            color: default_color(),
            background: default_background(),
        }
    }
}

impl RenderConfig {
    pub fn style(&self) -> ShapeStyle {
        ShapeStyle {
            width: self.width,
            height: self.height,
            stroke: self.stroke,
            color: self.color.clone(),
            background: self.background.clone(),
        }
    }
}

/// Command resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// `strict` or `creative`
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    Mode::default().as_str().to_string()
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self { mode: default_mode() }
    }
}

impl ResolveConfig {
    /// Parsed mode; invalid values are caught by [`T2sConfig::validate`].
    pub fn mode(&self) -> Mode {
        self.mode.parse().unwrap_or_default()
    }
}

/// Scene normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_max_shapes")]
    pub max_shapes: usize,
}

fn default_max_shapes() -> usize {
    MAX_SCENE_SHAPES
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { max_shapes: default_max_shapes() }
    }
}

/// External text generator used by `sketch`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Program to run; `None` disables generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Where generated images go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_output_dir() }
    }
}

/// Error collection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub collect_errors: bool,
    #[serde(default = "default_error_file")]
    pub error_file: PathBuf,
}

fn default_error_file() -> PathBuf {
    PathBuf::from(".t2s-errors.jsonl")
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { collect_errors: false, error_file: default_error_file() }
    }
}

/// Complete t2s.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct T2sConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Dotted path to the invalid field (e.g., "render.width")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t2s.toml: '{}' {}", self.field, self.message)
    }
}

impl T2sConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: String| {
            if !ok {
                errors.push(ConfigValidationError { field: field.to_string(), message });
            }
        };

        let dim_range = 1..=MAX_CANVAS_DIM;
        check(
            dim_range.contains(&self.render.width),
            "render.width",
            format!("must be between 1 and {}", MAX_CANVAS_DIM),
        );
        check(
            dim_range.contains(&self.render.height),
            "render.height",
            format!("must be between 1 and {}", MAX_CANVAS_DIM),
        );
        check(
            (1..=MAX_STROKE).contains(&self.render.stroke),
            "render.stroke",
            format!("must be between 1 and {}", MAX_STROKE),
        );
        check(
            (1..=MAX_SCENE_SHAPES).contains(&self.scene.max_shapes),
            "scene.max_shapes",
            format!("must be between 1 and {}", MAX_SCENE_SHAPES),
        );
        if let Err(e) = self.resolve.mode.parse::<Mode>() {
            check(false, "resolve.mode", e);
        }
        if let Some(command) = &self.generator.command {
            check(!command.trim().is_empty(), "generator.command", "must not be empty".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: T2sConfig = toml::from_str("").unwrap();
        assert_eq!(config, T2sConfig::default());
        assert_eq!(config.render.style(), ShapeStyle::default());
        assert_eq!(config.resolve.mode(), Mode::Creative);
        assert_eq!(config.scene.max_shapes, 12);
        assert_eq!(config.output.dir, PathBuf::from("outputs"));
        assert!(config.generator.command.is_none());
        assert!(!config.telemetry.collect_errors);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml = r##"
[render]
width = 512
height = 256
stroke = 5
color = "navy"
background = "#fafafa"

[resolve]
mode = "strict"

[scene]
max_shapes = 6

[generator]
command = "ollama"
args = ["run", "llama3"]

[output]
dir = "art"

[telemetry]
collect_errors = true
error_file = "errors.jsonl"
"##;
        let config: T2sConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.render.width, 512);
        assert_eq!(config.render.height, 256);
        assert_eq!(config.render.style().color, "navy");
        assert_eq!(config.render.background, "#fafafa");
        assert_eq!(config.resolve.mode(), Mode::Strict);
        assert_eq!(config.scene.max_shapes, 6);
        assert_eq!(config.generator.command.as_deref(), Some("ollama"));
        assert_eq!(config.generator.args, vec!["run", "llama3"]);
        assert_eq!(config.output.dir, PathBuf::from("art"));
        assert!(config.telemetry.collect_errors);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: T2sConfig = toml::from_str("[render]\nstroke = 8\n").unwrap();
        assert_eq!(config.render.stroke, 8);
        assert_eq!(config.render.width, 300);
        assert_eq!(config.render.color, "black");
    }

    #[test]
    fn test_validation_ranges() {
        let toml = r#"
[render]
width = 0
height = 5000
stroke = 65

[scene]
max_shapes = 13
"#;
        let config: T2sConfig = toml::from_str(toml).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["render.width", "render.height", "render.stroke", "scene.max_shapes"]);
    }

    #[test]
    fn test_validation_bad_mode() {
        let config: T2sConfig = toml::from_str("[resolve]\nmode = \"wild\"\n").unwrap();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "resolve.mode");
        assert!(errors[0].to_string().contains("wild"));
    }

    #[test]
    fn test_validation_blank_generator() {
        let config: T2sConfig = toml::from_str("[generator]\ncommand = \"  \"\n").unwrap();
        assert!(config.validate().iter().any(|e| e.field == "generator.command"));
    }
}
