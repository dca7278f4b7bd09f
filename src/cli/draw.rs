//! CLI dispatch for the `t2s draw` command.

use std::path::Path;
use std::process::ExitCode;

use crate::config::T2sConfig;
use crate::output::{generate_output_path, unix_timestamp};
use crate::renderer::draw_shape;
use crate::resolver::{resolve, suggestions};
use crate::sanitize::is_safe_input;
use crate::suggest::format_suggestion;
use crate::telemetry::{ErrorEntry, ErrorKind};

use super::{record, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the draw command.
pub fn run_draw(command: &str, config: &T2sConfig, output: Option<&Path>) -> ExitCode {
    if !is_safe_input(command) {
        eprintln!(
            "Error: command must be 1-80 letters, digits, spaces or ,._- characters: {:?}",
            command
        );
        record(ErrorEntry::new("draw", ErrorKind::UnsafeInput, command));
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mode = config.resolve.mode();
    let shape = match resolve(command, mode) {
        Some(shape) => shape,
        None => {
            eprintln!("Error: could not resolve '{}' to a shape ({} mode)", command.trim(), mode);
            let hint = format_suggestion(&suggestions(command));
            if let Some(ref hint) = hint {
                eprintln!("  {}", hint);
            }
            let mut entry = ErrorEntry::new("draw", ErrorKind::UnresolvedCommand, command.trim());
            if let Some(hint) = hint {
                entry = entry.with_suggestion(hint);
            }
            record(entry);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let path = generate_output_path(&config.output.dir, shape.as_str(), output, unix_timestamp());
    match draw_shape(shape.as_str(), &config.render.style(), &path) {
        Ok(saved) => {
            println!("Saved: {}", saved.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: failed to write '{}': {}", path.display(), e);
            record(
                ErrorEntry::new("draw", ErrorKind::IoError, e.to_string())
                    .with_file(path.display().to_string()),
            );
            ExitCode::from(EXIT_ERROR)
        }
    }
}
