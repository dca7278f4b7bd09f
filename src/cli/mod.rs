//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod draw;
mod info;
mod scene;
mod sketch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, T2sConfig};
use crate::resolver::Mode;
use crate::telemetry::{self, ErrorEntry};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "T2S_LOG";

/// t2s - Turn short text commands into line-art PNGs
#[derive(Parser)]
#[command(name = "t2s")]
#[command(about = "t2s - Turn short text commands and JSON scenes into line-art PNGs")]
#[command(version)]
pub struct Cli {
    /// Path to a t2s.toml (default: search upwards, then XDG config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a command to a shape and render it
    Draw {
        /// Shape command, e.g. "circle", "box", "sqare"
        command: String,

        /// Resolution mode
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Stroke width in pixels
        #[arg(long)]
        stroke: Option<u32>,

        /// Pen colour (name or hex)
        #[arg(long)]
        color: Option<String>,

        /// Background colour (name or hex)
        #[arg(long)]
        bg: Option<String>,

        /// Output file or directory.
        /// If omitted: {output.dir}/{timestamp}-{shape}.png
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Normalize a JSON scene and render it
    Scene {
        /// Scene file, `-` for stdin, or a directory of .json files
        input: PathBuf,

        /// Output file or directory (directory for batch input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the normalized scene JSON (renders only when -o is also given)
        #[arg(long)]
        print: bool,

        /// Maximum shapes kept from the scene (1-12)
        #[arg(long)]
        max_shapes: Option<usize>,
    },
    /// Turn a description into a scene with the configured generator
    Sketch {
        /// Free-form description, e.g. "a house with the sun"
        text: String,

        /// Generator command line, overriding [generator] in t2s.toml
        #[arg(long)]
        generator: Option<String>,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List shapes, synonyms and colours
    Shapes,
    /// Print the scene system prompt sent to generators
    Prompt,
}

/// Install the stderr tracing subscriber.
///
/// `T2S_LOG` wins when set; otherwise `-v` raises the level from warn.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Load t2s.toml, apply CLI overrides, then re-check the merged values.
fn prepare_config(
    path: Option<&std::path::Path>,
    overrides: &CliOverrides,
) -> Result<T2sConfig, String> {
    let mut config = load_config(path).map_err(|e| e.to_string())?;
    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))
    }
}

fn overrides_for(command: &Commands) -> CliOverrides {
    match command {
        Commands::Draw { mode, width, height, stroke, color, bg, .. } => CliOverrides {
            width: *width,
            height: *height,
            stroke: *stroke,
            color: color.clone(),
            background: bg.clone(),
            mode: *mode,
            ..Default::default()
        },
        Commands::Scene { max_shapes, .. } => {
            CliOverrides { max_shapes: *max_shapes, ..Default::default() }
        }
        Commands::Sketch { generator, .. } => {
            CliOverrides { generator: generator.clone(), ..Default::default() }
        }
        Commands::Shapes | Commands::Prompt => CliOverrides::default(),
    }
}

/// Log a failed command to the error telemetry file, if enabled
pub(crate) fn record(entry: ErrorEntry) {
    if telemetry::is_collection_enabled() {
        telemetry::log_error(&entry);
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match prepare_config(cli.config.as_deref(), &overrides_for(&cli.command)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    telemetry::init_collector(&config.telemetry.error_file, config.telemetry.collect_errors);

    match cli.command {
        Commands::Draw { command, output, .. } => {
            draw::run_draw(&command, &config, output.as_deref())
        }
        Commands::Scene { input, output, print, .. } => {
            scene::run_scene(&input, output.as_deref(), print, &config)
        }
        Commands::Sketch { text, output, .. } => {
            sketch::run_sketch(&text, output.as_deref(), &config)
        }
        Commands::Shapes => info::run_shapes(),
        Commands::Prompt => info::run_prompt(),
    }
}
