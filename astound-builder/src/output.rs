//! Output directory layout and file writes.

use std::{
    fs,
    path::{Path, PathBuf},
};

use astound_config::{Config, PUBLIC_JS_PREFIX};
use eyre::{Result, WrapErr};

use crate::loader::WorkerScript;

/// `<hash>.js`, the compiled page bundle.
pub fn bundle_path(output_dir: &Path, hash: &str) -> PathBuf {
    output_dir.join(format!("{hash}.js"))
}

/// `<hash>.client.js`, the page loader.
pub fn loader_path(output_dir: &Path, hash: &str) -> PathBuf {
    output_dir.join(format!("{hash}.client.js"))
}

/// Delete and recreate the output root and its `js` directory.
pub fn reset(config: &Config) -> Result<()> {
    let root = config.output_root();
    if root.exists() {
        fs::remove_dir_all(&root)
            .wrap_err_with(|| format!("failed to remove '{}'", root.display()))?;
    }
    let js = config.output_dir();
    fs::create_dir_all(&js).wrap_err_with(|| format!("failed to create '{}'", js.display()))
}

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
    }
    fs::write(path, content).wrap_err_with(|| format!("failed to write '{}'", path.display()))
}

/// Remove a file, returning whether it existed.
pub fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).wrap_err_with(|| format!("failed to remove '{}'", path.display())),
    }
}

/// Recover the worker scripts written by an earlier build.
///
/// Plugin names are not persisted, so recovered entries are unnamed.
pub fn scan_workers(output_dir: &Path) -> Result<Vec<WorkerScript>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let entries = fs::read_dir(output_dir)
        .wrap_err_with(|| format!("failed to read '{}'", output_dir.display()))?;
    for entry in entries {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.starts_with("w.") && name.ends_with(".js") {
            files.push(name);
        }
    }
    files.sort();

    Ok(files
        .into_iter()
        .map(|file| WorkerScript {
            name: None,
            script: format!("{PUBLIC_JS_PREFIX}/{file}"),
        })
        .collect())
}
