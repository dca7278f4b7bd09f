//! text2shape - Turn short text commands and JSON scenes into line-art images
//!
//! This library provides functionality to:
//! - Resolve free-text commands to a small shape vocabulary (strict or creative)
//! - Normalize untrusted scene JSON into a bounded, grid-snapped [`models::Scene`]
//! - Render single shapes and scenes to PNG images
//! - Obtain scenes from an external text generator

pub mod cli;
pub mod color;
pub mod config;
pub mod generator;
pub mod models;
pub mod normalizer;
pub mod output;
pub mod parser;
pub mod renderer;
pub mod resolver;
pub mod sanitize;
pub mod shapes;
pub mod suggest;
pub mod telemetry;
