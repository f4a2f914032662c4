//! Loading of pre-compiled (`ts`/`js`) routes.

use std::path::Path;

use eyre::{Result, WrapErr, bail};

use crate::{cache::ModuleRef, routes::Route};

/// Loads a pre-compiled route as an executable module.
pub trait ModuleLoader: Send + Sync {
    /// Load the module at `path` for `route`.
    fn load(&self, path: &Path, route: &Route) -> Result<ModuleRef>;
}

/// Registers the module by its app-relative path after checking that it is
/// a readable file. Execution is left to the server runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsModuleLoader;

impl ModuleLoader for FsModuleLoader {
    fn load(&self, path: &Path, route: &Route) -> Result<ModuleRef> {
        let metadata = std::fs::metadata(path)
            .wrap_err_with(|| format!("failed to load module '{}'", path.display()))?;
        if !metadata.is_file() {
            bail!("module '{}' is not a file", path.display());
        }

        Ok(ModuleRef {
            module: route.file.clone(),
            alias: route.file.clone(),
        })
    }
}
