//! Configuration for the t2s command line
//!
//! Provides types, discovery and loading for `t2s.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
