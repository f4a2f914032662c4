//! Plugin contract for the page transform pipeline.
//!
//! Every capability is optional. A plugin may rewrite a route's JS or HTML
//! through [`Plugin::transform`], contribute a global worker script through
//! [`Plugin::add_script`], or both.

pub mod builtin;
mod registry;

use std::{fmt, sync::Arc};

use eyre::Result;
use futures::future::{self, BoxFuture, FutureExt};

pub use registry::{PluginFactory, PluginRegistry};

/// Output of a transform, overwriting the matching accumulator slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutput {
    Html(String),
    Js(String),
}

/// The `{js, html}` pair threaded through one route's plugin chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    pub js: String,
    pub html: String,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot named by `output`.
    pub fn apply(&mut self, output: TransformOutput) {
        match output {
            TransformOutput::Html(code) => self.html = code,
            TransformOutput::Js(code) => self.js = code,
        }
    }
}

/// What a transform sees: the route, its source, and prior plugins' output.
#[derive(Debug, Clone, Copy)]
pub struct TransformInput<'a> {
    /// Route `file` identifier.
    pub route: &'a str,
    /// Route extension.
    pub ext: &'a str,
    /// Raw source text.
    pub source: &'a str,
    /// Accumulator as left by the plugins registered before this one.
    pub accumulator: &'a Accumulator,
}

/// A transform in progress. Synchronous transforms return [`ready`].
pub type TransformFuture<'a> = BoxFuture<'a, Result<Option<TransformOutput>>>;

/// Wrap an already-computed transform result.
pub fn ready<'a>(output: Option<TransformOutput>) -> TransformFuture<'a> {
    future::ready(Ok(output)).boxed()
}

/// A transform stage of the page pipeline.
///
/// # Example
///
/// ```ignore
/// struct Banner;
///
/// impl Plugin for Banner {
///     fn name(&self) -> Option<&str> { Some("banner") }
///
///     fn transform<'a>(&'a self, input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
///         let html = format!("<header>hi</header>{}", input.accumulator.html);
///         Some(ready(Some(TransformOutput::Html(html))))
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Name used in logs and worker script entries.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Transform one route.
    ///
    /// Returns `None` when the plugin has no transform capability. The
    /// future resolves to `None` when the plugin inspects but does not
    /// rewrite. An error aborts the route's build.
    #[allow(unused_variables)]
    fn transform<'a>(&'a self, input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
        None
    }

    /// Global script loaded on every page, requested once per full build.
    fn add_script(&self) -> Option<String> {
        None
    }
}

/// A configured plugin: a name resolved through the registry, or a plugin
/// object supplied directly.
#[derive(Clone)]
pub enum PluginDescriptor {
    Reference(String),
    Resolved(Arc<dyn Plugin>),
}

impl PluginDescriptor {
    pub fn resolved(plugin: impl Plugin + 'static) -> Self {
        PluginDescriptor::Resolved(Arc::new(plugin))
    }
}

impl From<&str> for PluginDescriptor {
    fn from(name: &str) -> Self {
        PluginDescriptor::Reference(name.to_string())
    }
}

impl From<String> for PluginDescriptor {
    fn from(name: String) -> Self {
        PluginDescriptor::Reference(name)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginDescriptor::Reference(name) => f.debug_tuple("Reference").field(name).finish(),
            PluginDescriptor::Resolved(plugin) => f
                .debug_tuple("Resolved")
                .field(&plugin.name().unwrap_or("<anonymous>"))
                .finish(),
        }
    }
}

/// Display name of a plugin for logs.
pub(crate) fn display_name(plugin: &dyn Plugin) -> &str {
    plugin.name().unwrap_or("<anonymous>")
}
