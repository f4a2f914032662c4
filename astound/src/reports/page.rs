//! Reports for single-route lifecycle operations.

use std::path::{Path, PathBuf};

use astound_builder::{CacheEntry, RemovedPage, Route};
use astound_config::Config;

use super::{
    describe,
    output::{Output, Report},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Created,
    Updated,
}

/// Report data from `new` and `update`.
#[derive(Debug)]
pub struct PageReport {
    pub action: PageAction,
    pub route: Route,
    pub entry: CacheEntry,
}

impl PageReport {
    pub fn new(action: PageAction, route: Route, entry: CacheEntry) -> Self {
        Self {
            action,
            route,
            entry,
        }
    }
}

impl Report for PageReport {
    fn render(&self, out: &mut dyn Output) {
        let verb = match self.action {
            PageAction::Created => "Created",
            PageAction::Updated => "Updated",
        };
        out.preformatted(&format!("{} {}", verb, self.route.file));
        out.key_value_indented("url", &self.route.url_path());
        out.key_value_indented("output", &describe(&self.entry));
    }
}

/// Report data from `remove`.
#[derive(Debug)]
pub struct RemoveReport {
    pub route: Route,
    /// Deleted files, relative to the output directory where possible.
    pub deleted: Vec<PathBuf>,
}

impl RemoveReport {
    pub fn new(config: &Config, removed: RemovedPage) -> Self {
        let output_dir = config.output_dir();
        Self {
            deleted: removed
                .deleted
                .iter()
                .map(|path| relative_to(path, &output_dir))
                .collect(),
            route: removed.route,
        }
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

impl Report for RemoveReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("Removed {}", self.route.file));
        for path in &self.deleted {
            out.removed_item(&path.display().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_render_page_report() {
        let report = PageReport::new(
            PageAction::Updated,
            Route::new("blog/index.html"),
            CacheEntry::Hash("deadbeef".into()),
        );

        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Updated blog/index.html",
                "  url: /blog",
                "  output: deadbeef",
            ]
        );
    }

    #[test]
    fn test_remove_report_strips_output_dir() {
        let config = Config::new("/site");
        let output_dir = config.output_dir();
        let removed = RemovedPage {
            route: Route::new("about.html"),
            entry: CacheEntry::Hash("deadbeef".into()),
            deleted: vec![
                output_dir.join("deadbeef.js"),
                output_dir.join("deadbeef.client.js"),
            ],
        };

        let mut out = BufferOutput::default();
        RemoveReport::new(&config, removed).render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Removed about.html",
                "  - deadbeef.js",
                "  - deadbeef.client.js",
            ]
        );
    }
}
