//! PNG output and file path generation

use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file.
///
/// Parent directories are created when missing.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Seconds since the Unix epoch, used to keep generated names unique.
pub fn unix_timestamp() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

/// Keep file names to `[a-z0-9_-]`; anything else becomes `_`.
fn file_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "output".to_string()
    } else {
        cleaned
    }
}

/// Generate the output path for one render.
///
/// # Output Naming Rules
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{dir}/{timestamp}-{label}.png` |
/// | `-o out.png` | `out.png` |
/// | `-o dir/` or an existing directory | `dir/{timestamp}-{label}.png` |
pub fn generate_output_path(
    dir: &Path,
    label: &str,
    output_arg: Option<&Path>,
    timestamp: u64,
) -> PathBuf {
    let file_name = format!("{}-{}.png", timestamp, file_label(label));
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(file_name)
            } else {
                output.to_path_buf()
            }
        }
        None => dir.join(file_name),
    }
}

/// Output path for one file of a batch: `{dir}/{input_stem}.png`.
pub fn batch_output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("scene");
    dir.join(format!("{}.png", file_label(stem)))
}
