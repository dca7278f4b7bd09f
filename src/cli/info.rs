//! Info command implementations (shapes, prompt)

use std::process::ExitCode;

use crate::color::{COLOR_ALIASES, SUPPORTED_COLORS};
use crate::generator::SCENE_SYSTEM_PROMPT;
use crate::models::ShapeName;
use crate::resolver::SYNONYMS;

use super::EXIT_SUCCESS;

/// Execute the shapes command
pub fn run_shapes() -> ExitCode {
    println!("Shapes:");
    for shape in ShapeName::ALL {
        let kind = match shape.primitive() {
            Some(_) => "primitive (usable in scenes)",
            None => "composite",
        };
        println!("  {:<10} {}", shape.as_str(), kind);
    }

    println!();
    println!("Synonyms (creative mode):");
    for (alias, shape) in SYNONYMS {
        println!("  {:<10} -> {}", alias, shape);
    }

    println!();
    println!("Scene colors:");
    println!("  {}", SUPPORTED_COLORS.join(", "));
    println!("Color aliases:");
    for (alias, color) in COLOR_ALIASES {
        println!("  {:<10} -> {}", alias, color);
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the prompt command
pub fn run_prompt() -> ExitCode {
    println!("{}", SCENE_SYSTEM_PROMPT);
    ExitCode::from(EXIT_SUCCESS)
}
