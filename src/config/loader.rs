//! Configuration loading and discovery for `t2s.toml`

use super::schema::T2sConfig;
use crate::resolver::Mode;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "t2s.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse t2s.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub stroke: Option<u32>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub mode: Option<Mode>,
    pub max_shapes: Option<usize>,
    /// Generator command line, split on whitespace
    pub generator: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Find t2s.toml by walking up from the current working directory,
/// then falling back to the XDG config directory.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Checks `$XDG_CONFIG_HOME/text2shape/t2s.toml` or `~/.config/text2shape/t2s.toml`
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("text2shape").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find t2s.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from the discovered t2s.toml.
///
/// With no explicit path and no file found, the defaults are returned.
/// An explicit path that cannot be read is an error.
pub fn load_config(path: Option<&Path>) -> Result<T2sConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<T2sConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let config: T2sConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Configuration used when no t2s.toml exists.
pub fn default_config() -> T2sConfig {
    T2sConfig::default()
}

/// Merge CLI overrides into a configuration. CLI arguments win.
///
/// Overridden values are not re-validated here; callers run
/// [`T2sConfig::validate`] afterwards when the values came from a user.
pub fn merge_cli_overrides(config: &mut T2sConfig, overrides: &CliOverrides) {
    if let Some(width) = overrides.width {
        config.render.width = width;
    }
    if let Some(height) = overrides.height {
        config.render.height = height;
    }
    if let Some(stroke) = overrides.stroke {
        config.render.stroke = stroke;
    }
    if let Some(ref color) = overrides.color {
        config.render.color = color.clone();
    }
    if let Some(ref background) = overrides.background {
        config.render.background = background.clone();
    }
    if let Some(mode) = overrides.mode {
        config.resolve.mode = mode.as_str().to_string();
    }
    if let Some(max_shapes) = overrides.max_shapes {
        config.scene.max_shapes = max_shapes;
    }
    if let Some(ref line) = overrides.generator {
        let mut parts = line.split_whitespace().map(str::to_string);
        config.generator.command = parts.next();
        config.generator.args = parts.collect();
    }
    if let Some(ref dir) = overrides.output_dir {
        config.output.dir = dir.clone();
    }
}
