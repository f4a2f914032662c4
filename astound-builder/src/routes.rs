//! Route descriptors and discovery.

use std::path::{Component, Path, PathBuf};

use eyre::{Result, WrapErr, bail};
use walkdir::WalkDir;

/// Extensions of routes that are already compiled and bypass plugin transforms.
pub const PRECOMPILED_EXTENSIONS: &[&str] = &["ts", "js"];

/// One route source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    /// Path relative to the app directory, `/`-separated.
    pub file: String,
    /// Extension without the leading dot.
    pub ext: String,
}

impl Route {
    /// Build a route from its app-relative path, deriving the extension.
    ///
    /// Separators are normalized to `/` and `.` segments dropped, so
    /// `./blog/post.html` names the same route as `blog/post.html`.
    pub fn new(file: impl Into<String>) -> Self {
        let file = normalize(&file.into());
        let ext = Path::new(&file)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file, ext }
    }

    /// Build a route from user input, rejecting paths that leave the app
    /// directory.
    pub fn parse(file: &str) -> Result<Self> {
        let route = Self::new(file);
        route.validate()?;
        Ok(route)
    }

    /// Check that the route is a non-empty path inside the app directory.
    pub fn validate(&self) -> Result<()> {
        if self.file.is_empty() {
            bail!("route path is empty");
        }
        let inside = Path::new(&self.file)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !inside {
            bail!("route '{}' must be relative to the app directory", self.file);
        }
        Ok(())
    }

    /// Whether this route is loaded as a module instead of transformed.
    pub fn is_precompiled(&self) -> bool {
        PRECOMPILED_EXTENSIONS.contains(&self.ext.as_str())
    }

    /// URL path this route is served under.
    ///
    /// `index.html` -> `/`, `blog/[slug].html` -> `/blog/[slug]`,
    /// `about/index.tsx` -> `/about`.
    pub fn url_path(&self) -> String {
        let stem = match self.file.rfind('.') {
            Some(dot) if dot > self.file.rfind('/').map_or(0, |s| s + 1) => &self.file[..dot],
            _ => self.file.as_str(),
        };
        let stem = if stem == "index" {
            ""
        } else {
            stem.strip_suffix("/index").unwrap_or(stem)
        };
        format!("/{stem}")
    }

    /// Dynamic segment names, e.g. `slug` for `blog/[slug].html`.
    pub fn params(&self) -> Vec<&str> {
        self.file
            .split('/')
            .filter_map(|segment| {
                let segment = segment.split('.').next().unwrap_or(segment);
                segment.strip_prefix('[')?.strip_suffix(']')
            })
            .collect()
    }
}

/// Discover every route under the app directory, sorted by path.
///
/// Hidden files and directories and files without an extension are skipped.
pub fn discover_routes(app_dir: &Path) -> Result<Vec<Route>> {
    let mut routes = Vec::new();

    let walker = WalkDir::new(app_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry =
            entry.wrap_err_with(|| format!("failed to scan '{}'", app_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(app_dir).unwrap_or(entry.path());
        let route = Route::new(to_route_file(relative));
        if !route.ext.is_empty() {
            routes.push(route);
        }
    }

    Ok(routes)
}

fn normalize(file: &str) -> String {
    let file = file.replace('\\', "/");
    let segments: Vec<_> = file
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if file.starts_with('/') {
        format!("/{}", segments.join("/"))
    } else {
        segments.join("/")
    }
}

fn to_route_file(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve a route's source path.
pub fn source_path(app_dir: &Path, route: &Route) -> PathBuf {
    app_dir.join(&route.file)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_route_new_derives_extension() {
        let route = Route::new("blog/post.html");
        assert_eq!(route.file, "blog/post.html");
        assert_eq!(route.ext, "html");
        assert!(!route.is_precompiled());
        assert!(Route::new("api/users.ts").is_precompiled());
    }

    #[test]
    fn test_route_new_drops_current_dir_segments() {
        assert_eq!(Route::new("./index.html").file, "index.html");
        assert_eq!(Route::new("blog/./post.html").file, "blog/post.html");
        assert_eq!(Route::new("blog\\post.html").file, "blog/post.html");
        assert_eq!(Route::new("./index.html"), Route::new("index.html"));
    }

    #[test]
    fn test_parse_accepts_app_relative_paths() {
        let route = Route::parse("./blog/[slug].html").unwrap();
        assert_eq!(route.file, "blog/[slug].html");
        assert_eq!(route.ext, "html");
    }

    #[test]
    fn test_parse_rejects_paths_outside_app_dir() {
        for file in ["../x.html", "blog/../../x.html", "/etc/x.html", "", "./"] {
            assert!(Route::parse(file).is_err(), "{file:?} should be rejected");
        }
    }

    #[test]
    fn test_url_path() {
        assert_eq!(Route::new("index.html").url_path(), "/");
        assert_eq!(Route::new("about.tsx").url_path(), "/about");
        assert_eq!(Route::new("about/index.tsx").url_path(), "/about");
        assert_eq!(Route::new("blog/[slug].html").url_path(), "/blog/[slug]");
    }

    #[test]
    fn test_params() {
        assert_eq!(Route::new("blog/[slug].html").params(), vec!["slug"]);
        assert_eq!(
            Route::new("[user]/posts/[id].html").params(),
            vec!["user", "id"]
        );
        assert!(Route::new("index.html").params().is_empty());
    }

    #[test]
    fn test_discover_routes() {
        let temp = TempDir::new().unwrap();
        let app = temp.path();
        fs::create_dir_all(app.join("blog")).unwrap();
        fs::create_dir_all(app.join(".cache")).unwrap();
        fs::write(app.join("index.html"), "").unwrap();
        fs::write(app.join("blog/[slug].html"), "").unwrap();
        fs::write(app.join("api.ts"), "").unwrap();
        fs::write(app.join("README"), "").unwrap();
        fs::write(app.join(".cache/stale.html"), "").unwrap();

        let routes = discover_routes(app).unwrap();
        let files: Vec<_> = routes.iter().map(|r| r.file.as_str()).collect();

        assert_eq!(files, vec!["api.ts", "blog/[slug].html", "index.html"]);
    }

    #[test]
    fn test_discover_routes_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        assert!(discover_routes(&temp.path().join("missing")).is_err());
    }
}
