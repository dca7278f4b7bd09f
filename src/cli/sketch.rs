//! CLI dispatch for the `t2s sketch` command.

use std::path::Path;
use std::process::ExitCode;

use crate::config::T2sConfig;
use crate::generator::{text_to_scene, CommandGenerator};
use crate::models::Scene;
use crate::output::{generate_output_path, unix_timestamp};
use crate::renderer::{draw_scene, draw_shape};
use crate::resolver::{resolve, suggestions, Mode};
use crate::sanitize::is_safe_input;
use crate::suggest::format_suggestion;
use crate::telemetry::{ErrorEntry, ErrorKind};

use super::{record, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

fn generate_scene(text: &str, config: &T2sConfig) -> Option<Scene> {
    let Some(program) = config.generator.command.as_deref() else {
        tracing::info!("no generator configured, using shape resolution");
        return None;
    };

    let generator = CommandGenerator::new(program, config.generator.args.clone());
    let scene = text_to_scene(&generator, text, config.scene.max_shapes);
    if scene.is_none() {
        eprintln!("Warning: generator returned no usable scene; falling back to a single shape");
        record(ErrorEntry::new("sketch", ErrorKind::NoScene, text.trim()));
    }
    scene
}

/// Execute the sketch command.
///
/// Uses the generator when one is configured. Without a scene, the text is
/// resolved in creative mode and drawn as a single shape.
pub fn run_sketch(text: &str, output: Option<&Path>, config: &T2sConfig) -> ExitCode {
    if !is_safe_input(text) {
        eprintln!("Error: text must be 1-80 letters, digits, spaces or ,._- characters: {:?}", text);
        record(ErrorEntry::new("sketch", ErrorKind::UnsafeInput, text));
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let result = if let Some(scene) = generate_scene(text, config) {
        let path = generate_output_path(&config.output.dir, "sketch", output, unix_timestamp());
        draw_scene(&scene, &path).map_err(|e| (path, e))
    } else {
        let Some(shape) = resolve(text, Mode::Creative) else {
            eprintln!("Error: could not turn '{}' into a scene or a shape", text.trim());
            let hint = format_suggestion(&suggestions(text));
            if let Some(ref hint) = hint {
                eprintln!("  {}", hint);
            }
            let mut entry = ErrorEntry::new("sketch", ErrorKind::UnresolvedCommand, text.trim());
            if let Some(hint) = hint {
                entry = entry.with_suggestion(hint);
            }
            record(entry);
            return ExitCode::from(EXIT_ERROR);
        };
        let path =
            generate_output_path(&config.output.dir, shape.as_str(), output, unix_timestamp());
        draw_shape(shape.as_str(), &config.render.style(), &path).map_err(|e| (path, e))
    };

    match result {
        Ok(saved) => {
            println!("Saved: {}", saved.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err((path, e)) => {
            eprintln!("Error: failed to write '{}': {}", path.display(), e);
            record(
                ErrorEntry::new("sketch", ErrorKind::IoError, e.to_string())
                    .with_file(path.display().to_string()),
            );
            ExitCode::from(EXIT_ERROR)
        }
    }
}
