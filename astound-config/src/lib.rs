//! Configuration for the Astound page builder.
//!
//! Parses and validates `astound.toml` and derives the on-disk layout
//! (`<public>/.astound/...`) every build operation writes into.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;

pub use config::{
    CACHE_FILE, CONFIG_FILE, Config, OUTPUT_JS, OUTPUT_ROOT, PUBLIC_JS_PREFIX,
};
pub use error::{Error, Result};
pub use file::AstoundToml;
