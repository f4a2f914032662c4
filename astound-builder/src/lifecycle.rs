//! Create, update and remove single routes against the persisted cache.

use std::path::PathBuf;

use eyre::Result;

use crate::{
    builder::Builder,
    cache::{CacheEntry, CacheError},
    output,
    routes::Route,
};

/// Result of removing a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedPage {
    pub route: Route,
    /// The entry that was dropped from the cache.
    pub entry: CacheEntry,
    /// Output files deleted along with the entry.
    pub deleted: Vec<PathBuf>,
}

impl Builder {
    /// Build a route that was just created. No cache check is made.
    pub async fn new_page(&mut self, route: &Route) -> Result<CacheEntry> {
        log::info!("new page {}", route.file);
        self.build_page(route).await
    }

    /// Rebuild a route that an earlier build already produced.
    ///
    /// # Errors
    ///
    /// Fails with [`CacheError::NotCached`] without touching the filesystem
    /// when the persisted cache has no entry for the route.
    pub async fn update_page(&mut self, route: &Route) -> Result<CacheEntry> {
        self.ensure_cached(route)?;
        log::info!("update page {}", route.file);
        self.build_page(route).await
    }

    /// Drop a route from the cache and delete its output files.
    ///
    /// # Errors
    ///
    /// Fails with [`CacheError::NotCached`] when the persisted cache has no
    /// entry for the route.
    pub fn remove_page(&mut self, route: &Route) -> Result<RemovedPage> {
        self.ensure_cached(route)?;

        self.persisted.remove(&route.file);
        let Some(entry) = self.pages.remove(&route.file) else {
            return Err(self.not_cached(route));
        };
        self.persist()?;

        let mut deleted = Vec::new();
        if let Some(hash) = entry.hash() {
            let output_dir = self.config().output_dir();
            for path in [
                output::bundle_path(&output_dir, hash),
                output::loader_path(&output_dir, hash),
            ] {
                if output::remove_file(&path)? {
                    deleted.push(path);
                }
            }
        }

        log::info!("removed page {}", route.file);
        Ok(RemovedPage {
            route: route.clone(),
            entry,
            deleted,
        })
    }

    fn ensure_cached(&mut self, route: &Route) -> Result<()> {
        route.validate()?;
        self.refresh()?;
        if self.persisted.contains(&route.file) {
            Ok(())
        } else {
            Err(self.not_cached(route))
        }
    }

    fn not_cached(&self, route: &Route) -> eyre::Report {
        let err = CacheError::NotCached {
            route: route.file.clone(),
        };
        log::error!("{err}");
        err.into()
    }
}
