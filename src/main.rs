//! t2s - Command-line tool for turning text commands and scenes into PNGs

use std::process::ExitCode;

use text2shape::cli;

fn main() -> ExitCode {
    cli::run()
}
