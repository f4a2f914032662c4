//! Page build pipeline for Astound.
//!
//! Turns the route sources of an app directory into browser-loadable
//! artifacts under `<public>/.astound/js`: a bundle (`<hash>.js`) and a
//! self-mounting loader (`<hash>.client.js`) per route, plus one worker
//! script (`w.<hash>.js`) per plugin that contributes one. Route hashes are
//! persisted in `<public>/.astound/client.json` and reused across builds.
//!
//! # Module Organization
//!
//! - [`plugin`] - Plugin contract, registry and built-in plugins
//! - [`pipeline`] - Sequential per-route transform pipeline
//! - [`loader`] - Client loader script generation
//! - [`cache`] - Page cache and its persisted form
//! - [`routes`] - Route descriptors and discovery
//! - [`Builder`] - Full builds and single-route lifecycle operations

mod builder;
pub mod cache;
mod hash;
mod lifecycle;
pub mod loader;
pub mod module;
pub mod output;
pub mod pipeline;
pub mod plugin;
pub mod routes;

pub use builder::{BuildReport, Builder, BuiltPage};
pub use cache::{CacheEntry, CacheError, ModuleRef, PageCache};
pub use lifecycle::RemovedPage;
pub use loader::{WorkerScript, generate_html};
pub use plugin::{
    Accumulator, Plugin, PluginDescriptor, PluginRegistry, TransformFuture, TransformInput,
    TransformOutput,
};
pub use routes::Route;
