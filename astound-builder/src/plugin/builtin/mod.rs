//! Plugins appended to every build after the configured ones.

mod client;
mod html;
mod params;

use std::sync::Arc;

pub use client::ClientPlugin;
pub use html::HtmlPlugin;
pub use params::ParamsPlugin;

use super::PluginDescriptor;

/// The built-in plugins in the order they run.
pub fn builtins() -> Vec<PluginDescriptor> {
    vec![
        PluginDescriptor::Resolved(Arc::new(HtmlPlugin)),
        PluginDescriptor::Resolved(Arc::new(ClientPlugin)),
        PluginDescriptor::Resolved(Arc::new(ParamsPlugin)),
    ]
}
