//! Routes command report.

use astound_builder::{CacheEntry, Route};

use super::{
    describe,
    output::{Output, Report},
};

/// A discovered route and its persisted cache entry, if any.
#[derive(Debug)]
pub struct RouteInfo {
    pub route: Route,
    pub url: String,
    pub entry: Option<CacheEntry>,
}

#[derive(Debug)]
pub struct RoutesReport {
    pub routes: Vec<RouteInfo>,
}

impl Report for RoutesReport {
    fn render(&self, out: &mut dyn Output) {
        if self.routes.is_empty() {
            out.preformatted("No routes found");
            return;
        }

        out.section(&format!("Routes ({})", self.routes.len()));
        for info in &self.routes {
            let state = match &info.entry {
                Some(entry) => describe(entry),
                None => "not built".to_string(),
            };
            out.list_item(&format!("{} {} ({})", info.url, info.route.file, state));
        }

        let pending = self.routes.iter().filter(|r| r.entry.is_none()).count();
        if pending > 0 {
            out.newline();
            out.key_value("Not built", &pending.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    fn info(file: &str, entry: Option<CacheEntry>) -> RouteInfo {
        let route = Route::new(file);
        RouteInfo {
            url: route.url_path(),
            route,
            entry,
        }
    }

    #[test]
    fn test_render_routes_with_cache_state() {
        let report = RoutesReport {
            routes: vec![
                info("index.html", Some(CacheEntry::Hash("1a2b3c4d".into()))),
                info("blog/[slug].html", None),
            ],
        };

        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Routes (2):",
                "  - / index.html (1a2b3c4d)",
                "  - /blog/[slug] blog/[slug].html (not built)",
                "",
                "Not built: 1",
            ]
        );
    }

    #[test]
    fn test_render_no_routes() {
        let mut out = BufferOutput::default();
        RoutesReport { routes: Vec::new() }.render(&mut out);

        assert_eq!(out.lines, vec!["No routes found"]);
    }
}
