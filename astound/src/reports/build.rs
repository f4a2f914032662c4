//! Build command report.

use std::path::PathBuf;

use astound_builder::{BuiltPage, WorkerScript};
use astound_config::Config;

use super::{
    describe,
    output::{Output, Report},
};

/// Report data from a full build.
#[derive(Debug)]
pub struct BuildReport {
    /// Directory the bundles and loaders were written to.
    pub output_dir: PathBuf,
    pub pages: Vec<BuiltPage>,
    pub workers: Vec<WorkerScript>,
}

impl BuildReport {
    pub fn new(config: &Config, result: astound_builder::BuildReport) -> Self {
        Self {
            output_dir: config.output_dir(),
            pages: result.pages,
            workers: result.workers,
        }
    }
}

impl Report for BuildReport {
    fn render(&self, out: &mut dyn Output) {
        if self.pages.is_empty() {
            out.warning("no routes found in the app directory");
        }

        out.key_value("Output", &self.output_dir.display().to_string());
        out.newline();

        out.section(&format!("Routes ({})", self.pages.len()));
        for page in &self.pages {
            out.added_item(&format!(
                "{} ({}) -> {}",
                page.route.file,
                page.route.url_path(),
                describe(&page.entry)
            ));
        }

        if !self.workers.is_empty() {
            out.newline();
            out.section(&format!("Worker scripts ({})", self.workers.len()));
            for worker in &self.workers {
                match &worker.name {
                    Some(name) => out.added_item(&format!("{} -> {}", name, worker.script)),
                    None => out.added_item(&worker.script),
                }
            }
        }
    }
}
