//! CLI dispatch for the `t2s scene` command.
//!
//! Input is a scene file, `-` for stdin, or a directory whose `.json` files
//! are rendered in parallel.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;
use rayon::prelude::*;

use crate::config::T2sConfig;
use crate::models::Scene;
use crate::normalizer::normalize_str;
use crate::output::{batch_output_path, generate_output_path, unix_timestamp};
use crate::renderer::draw_scene;
use crate::telemetry::{ErrorEntry, ErrorKind};

use super::{record, EXIT_ERROR, EXIT_SUCCESS};

/// Find the `.json` files directly inside a directory, sorted by path.
pub fn find_scene_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = dir.join("*.json");
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())
        .map(|paths| paths.filter_map(Result::ok).collect())
        .unwrap_or_default();
    files.sort();
    files
}

fn read_input(input: &Path) -> std::io::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input)
    }
}

fn warn_if_empty(scene: &Scene, source: &str) {
    if scene.is_empty() {
        eprintln!("Warning: no usable shapes in '{}'; rendering an empty canvas", source);
        record(
            ErrorEntry::new("scene", ErrorKind::EmptyScene, "scene normalized to zero shapes")
                .with_file(source),
        );
    }
}

/// Execute the scene command.
pub fn run_scene(input: &Path, output: Option<&Path>, print: bool, config: &T2sConfig) -> ExitCode {
    if input.is_dir() {
        return run_batch(input, output, config);
    }

    let source = input.display().to_string();
    let text = match read_input(input) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", source, e);
            record(ErrorEntry::new("scene", ErrorKind::IoError, e.to_string()).with_file(&source));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let scene = normalize_str(&text, config.scene.max_shapes);
    tracing::info!(
        shapes = ?scene.shapes.iter().map(|s| s.primitive().as_str()).collect::<Vec<_>>(),
        "normalized scene"
    );
    warn_if_empty(&scene, &source);

    if print {
        match serde_json::to_string_pretty(&scene) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        if output.is_none() {
            return ExitCode::from(EXIT_SUCCESS);
        }
    }

    let label = match input.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if stem != "-" => stem,
        _ => "scene",
    };
    let path = generate_output_path(&config.output.dir, label, output, unix_timestamp());
    match draw_scene(&scene, &path) {
        Ok(saved) => {
            // Keep stdout pure JSON when printing
            if print {
                eprintln!("Saved: {}", saved.display());
            } else {
                println!("Saved: {}", saved.display());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: failed to write '{}': {}", path.display(), e);
            record(
                ErrorEntry::new("scene", ErrorKind::IoError, e.to_string())
                    .with_file(path.display().to_string()),
            );
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Render every scene file in `dir` into `{out}/{stem}.png`.
fn run_batch(dir: &Path, output: Option<&Path>, config: &T2sConfig) -> ExitCode {
    let files = find_scene_files(dir);
    if files.is_empty() {
        eprintln!("Error: no .json files found in '{}'", dir.display());
        return ExitCode::from(EXIT_ERROR);
    }
    let out_dir = output.unwrap_or(&config.output.dir);
    let max_shapes = config.scene.max_shapes;

    let results: Vec<(PathBuf, Result<PathBuf, String>)> = files
        .par_iter()
        .map(|file| {
            let result = std::fs::read_to_string(file).map_err(|e| e.to_string()).and_then(|text| {
                let scene = normalize_str(&text, max_shapes);
                warn_if_empty(&scene, &file.display().to_string());
                draw_scene(&scene, &batch_output_path(out_dir, file)).map_err(|e| e.to_string())
            });
            (file.clone(), result)
        })
        .collect();

    let mut failed = 0usize;
    for (file, result) in &results {
        match result {
            Ok(saved) => println!("Saved: {}", saved.display()),
            Err(e) => {
                failed += 1;
                eprintln!("Error: {}: {}", file.display(), e);
                record(
                    ErrorEntry::new("scene", ErrorKind::IoError, e.as_str())
                        .with_file(file.display().to_string()),
                );
            }
        }
    }

    tracing::info!(total = results.len(), failed, "batch finished");
    if failed == 0 {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
