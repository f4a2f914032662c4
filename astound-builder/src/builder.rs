//! Build orchestrator.

use std::{fs, sync::Arc};

use astound_config::Config;
use eyre::{Result, WrapErr};

use crate::{
    cache::{CacheEntry, PageCache},
    hash::{WORKER_HASH_BYTES, fresh_page_hash, random_hash},
    loader::{WorkerScript, generate_html},
    module::{FsModuleLoader, ModuleLoader},
    output,
    pipeline::TransformPipeline,
    plugin::{Plugin, PluginDescriptor, PluginRegistry, builtin, display_name},
    routes::{Route, discover_routes, source_path},
};

/// One route processed by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPage {
    pub route: Route,
    pub entry: CacheEntry,
}

/// Result of a full build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: Vec<BuiltPage>,
    pub workers: Vec<WorkerScript>,
}

/// Owns the state of a build session: the in-memory page cache, the
/// persisted snapshot read at the start of the current operation, and the
/// worker scripts of the last full build.
///
/// # Example
///
/// ```ignore
/// let mut builder = Builder::new(Config::load(".", "astound.toml")?)
///     .plugin(MyPlugin::new());
///
/// let report = builder.build().await?;
/// builder.update_page(&Route::new("index.html")).await?;
/// ```
pub struct Builder {
    config: Config,
    plugins: Vec<PluginDescriptor>,
    registry: PluginRegistry,
    loader: Box<dyn ModuleLoader>,
    pub(crate) pages: PageCache,
    pub(crate) persisted: PageCache,
    workers: Option<Vec<WorkerScript>>,
}

impl Builder {
    /// Create a builder whose plugin list comes from the configuration.
    pub fn new(config: Config) -> Self {
        let plugins = config
            .plugins
            .iter()
            .cloned()
            .map(PluginDescriptor::Reference)
            .collect();

        Self {
            config,
            plugins,
            registry: PluginRegistry::with_builtins(),
            loader: Box::new(FsModuleLoader),
            pages: PageCache::new(),
            persisted: PageCache::new(),
            workers: None,
        }
    }

    /// Append a plugin after the configured ones.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(PluginDescriptor::resolved(plugin));
        self
    }

    /// Replace the registry used to resolve plugin references.
    pub fn registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the loader for pre-compiled routes.
    pub fn module_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The in-memory page cache of this session.
    pub fn pages(&self) -> &PageCache {
        &self.pages
    }

    /// Discover the routes of the app directory.
    pub fn routes(&self) -> Result<Vec<Route>> {
        discover_routes(&self.config.app_dir())
    }

    /// Build every route from scratch.
    ///
    /// Hashes recorded by the previous build are reused, so unchanged routes
    /// keep their output filenames. Afterwards the persisted cache holds
    /// exactly the routes processed by this build.
    pub async fn build(&mut self) -> Result<BuildReport> {
        // Read before the reset below deletes the file.
        self.persisted = PageCache::load(&self.config.cache_file())?;
        self.pages.clear();

        output::reset(&self.config)?;

        let plugins = self.plugin_chain();
        let workers = self.write_workers(&plugins)?;
        self.workers = Some(workers.clone());

        let routes = self.routes()?;
        let mut pages = Vec::with_capacity(routes.len());
        for route in routes {
            let entry = self.build_route(&route, &plugins).await?;
            pages.push(BuiltPage { route, entry });
        }
        self.persist()?;

        log::info!(
            "built {} pages with {} worker scripts",
            pages.len(),
            workers.len()
        );
        Ok(BuildReport { pages, workers })
    }

    /// Build a single route against the persisted cache.
    pub async fn build_page(&mut self, route: &Route) -> Result<CacheEntry> {
        route.validate()?;
        self.refresh()?;
        let plugins = self.plugin_chain();
        self.build_route(route, &plugins).await
    }

    /// Re-read the persisted cache and fold it into the in-memory cache.
    pub(crate) fn refresh(&mut self) -> Result<()> {
        let persisted = PageCache::load(&self.config.cache_file())?;
        self.pages.merge(&persisted);
        self.persisted = persisted;
        Ok(())
    }

    /// Overwrite the persisted cache with the in-memory cache.
    pub(crate) fn persist(&self) -> Result<()> {
        self.pages.persist(&self.config.cache_file())
    }

    /// Configured plugins followed by the built-ins, resolved once.
    ///
    /// A built-in already present in the configured list, under the same
    /// name, is not appended a second time.
    fn plugin_chain(&self) -> Vec<Arc<dyn Plugin>> {
        let mut chain = self.registry.resolve_all(&self.plugins);

        for plugin in self.registry.resolve_all(&builtin::builtins()) {
            let configured = plugin
                .name()
                .is_some_and(|name| chain.iter().any(|p| p.name() == Some(name)));
            if configured {
                log::debug!("built-in plugin {} already configured", display_name(plugin.as_ref()));
            } else {
                chain.push(plugin);
            }
        }

        chain
    }

    fn write_workers(&self, plugins: &[Arc<dyn Plugin>]) -> Result<Vec<WorkerScript>> {
        let output_dir = self.config.output_dir();
        let mut workers = Vec::new();

        for plugin in plugins {
            let Some(script) = plugin.add_script() else {
                continue;
            };
            let hash = random_hash(WORKER_HASH_BYTES);
            output::write_file(&output_dir.join(WorkerScript::file_name(&hash)), &script)?;

            let worker = WorkerScript::new(plugin.name().map(str::to_string), &hash);
            log::debug!("worker script {} -> {}", display_name(plugin.as_ref()), worker.script);
            workers.push(worker);
        }

        Ok(workers)
    }

    /// Worker scripts of this session, recovered from disk when no full build
    /// ran in it.
    fn workers(&mut self) -> Result<&[WorkerScript]> {
        if self.workers.is_none() {
            self.workers = Some(output::scan_workers(&self.config.output_dir())?);
        }
        Ok(self.workers.as_deref().unwrap_or_default())
    }

    /// Reuse the persisted hash for `file` or mint an unused one.
    fn resolve_hash(&self, file: &str) -> String {
        match self.persisted.hash_of(file) {
            Some(hash) => hash.to_string(),
            None => fresh_page_hash(|h| self.pages.has_hash(h) || self.persisted.has_hash(h)),
        }
    }

    async fn build_route(
        &mut self,
        route: &Route,
        plugins: &[Arc<dyn Plugin>],
    ) -> Result<CacheEntry> {
        let path = source_path(&self.config.app_dir(), route);

        let entry = if route.is_precompiled() {
            CacheEntry::Module(self.loader.load(&path, route)?)
        } else {
            let hash = self.resolve_hash(&route.file);
            let source = fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read route '{}'", path.display()))?;

            // Reserved before the transforms run; `resolve_hash` treats it as taken.
            let previous = self
                .pages
                .insert(route.file.clone(), CacheEntry::Hash(hash.clone()));

            if let Err(err) = self.render_route(route, &source, &hash, plugins).await {
                match previous {
                    Some(entry) => {
                        self.pages.insert(route.file.clone(), entry);
                    }
                    None => {
                        self.pages.remove(&route.file);
                    }
                }
                return Err(err);
            }

            CacheEntry::Hash(hash)
        };

        log::debug!("{} -> {:?}", route.file, entry);
        self.pages.insert(route.file.clone(), entry.clone());
        self.persist()?;
        Ok(entry)
    }

    /// Run the transforms and write `<hash>.js` and `<hash>.client.js`.
    async fn render_route(
        &mut self,
        route: &Route,
        source: &str,
        hash: &str,
        plugins: &[Arc<dyn Plugin>],
    ) -> Result<()> {
        let accumulator = TransformPipeline::new(plugins).run(route, source).await?;

        let output_dir = self.config.output_dir();
        let loader = generate_html(&accumulator.html, self.workers()?);
        output::write_file(&output::bundle_path(&output_dir, hash), &accumulator.js)?;
        output::write_file(&output::loader_path(&output_dir, hash), &loader)
    }
}
