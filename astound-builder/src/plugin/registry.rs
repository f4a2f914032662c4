//! Name-keyed plugin registry.
//!
//! Configuration refers to plugins by name; the registry turns those names
//! into plugin objects.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = PluginRegistry::with_builtins();
//! registry.register("banner", || Ok(Arc::new(Banner) as Arc<dyn Plugin>));
//!
//! let plugins = registry.resolve_all(&[PluginDescriptor::from("banner")]);
//! ```

use std::{collections::HashMap, sync::Arc};

use eyre::{Result, eyre};

use super::{
    Plugin, PluginDescriptor,
    builtin::{ClientPlugin, HtmlPlugin, ParamsPlugin},
};

/// Constructs a plugin on resolution.
pub type PluginFactory = Box<dyn Fn() -> Result<Arc<dyn Plugin>> + Send + Sync>;

/// Registry of plugin factories keyed by reference name.
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in plugins registered under their names.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(HtmlPlugin::NAME, || Ok(Arc::new(HtmlPlugin) as Arc<dyn Plugin>));
        registry.register(ClientPlugin::NAME, || Ok(Arc::new(ClientPlugin) as Arc<dyn Plugin>));
        registry.register(ParamsPlugin::NAME, || Ok(Arc::new(ParamsPlugin) as Arc<dyn Plugin>));
        registry
    }

    /// Register a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Resolve a single descriptor.
    pub fn resolve(&self, descriptor: &PluginDescriptor) -> Result<Arc<dyn Plugin>> {
        match descriptor {
            PluginDescriptor::Resolved(plugin) => Ok(Arc::clone(plugin)),
            PluginDescriptor::Reference(name) => {
                let factory = self
                    .factories
                    .get(name)
                    .ok_or_else(|| eyre!("no plugin registered under '{name}'"))?;
                factory()
            }
        }
    }

    /// Resolve descriptors in order, logging and skipping failures.
    pub fn resolve_all(&self, descriptors: &[PluginDescriptor]) -> Vec<Arc<dyn Plugin>> {
        descriptors
            .iter()
            .filter_map(|descriptor| match self.resolve(descriptor) {
                Ok(plugin) => Some(plugin),
                Err(err) => {
                    log::error!("failed to load plugin {descriptor:?}: {err:#}");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Plugin for Named {
        fn name(&self) -> Option<&str> {
            Some(self.0)
        }
    }

    #[test]
    fn test_with_builtins() {
        let registry = PluginRegistry::with_builtins();
        assert!(registry.contains("html"));
        assert!(registry.contains("client"));
        assert!(registry.contains("params"));
    }

    #[test]
    fn test_resolve_reference() {
        let mut registry = PluginRegistry::new();
        registry.register("named", || Ok(Arc::new(Named("named")) as Arc<dyn Plugin>));

        let plugin = registry
            .resolve(&PluginDescriptor::from("named"))
            .unwrap();
        assert_eq!(plugin.name(), Some("named"));
    }

    #[test]
    fn test_resolve_unknown_reference_fails() {
        let registry = PluginRegistry::new();
        let err = registry
            .resolve(&PluginDescriptor::from("missing"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_resolve_all_skips_failures_and_keeps_order() {
        let mut registry = PluginRegistry::new();
        registry.register("a", || Ok(Arc::new(Named("a")) as Arc<dyn Plugin>));
        registry.register("broken", || Err(eyre!("cannot construct")));

        let plugins = registry.resolve_all(&[
            PluginDescriptor::from("a"),
            PluginDescriptor::from("missing"),
            PluginDescriptor::from("broken"),
            PluginDescriptor::resolved(Named("b")),
        ]);

        let names: Vec<_> = plugins.iter().map(|p| p.name().unwrap()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
