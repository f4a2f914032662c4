//! The `astound.toml` schema and the directory layout derived from it.

use std::{
    path::{Component, Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{AstoundToml, Error, Result};

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE: &str = "astound.toml";

/// Build output directory, relative to the public directory.
pub const OUTPUT_ROOT: &str = ".astound";

/// Compiled scripts directory, relative to [`OUTPUT_ROOT`].
pub const OUTPUT_JS: &str = "js";

/// Persisted page cache file, relative to [`OUTPUT_ROOT`].
pub const CACHE_FILE: &str = "client.json";

/// Public URL prefix under which compiled scripts are served.
pub const PUBLIC_JS_PREFIX: &str = "/.astound/js";

/// Root configuration for astound.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project root every other path is resolved against.
    #[serde(skip)]
    root: PathBuf,

    /// Public directory, served as-is.
    #[serde(default = "default_public")]
    pub public: PathBuf,

    /// Route source directory.
    #[serde(default = "default_app")]
    pub app: PathBuf,

    /// Plugin references, resolved by name when a build starts.
    #[serde(default)]
    pub plugins: Vec<String>,
}

fn default_public() -> PathBuf {
    PathBuf::from("public")
}

fn default_app() -> PathBuf {
    PathBuf::from("app")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            public: default_public(),
            app: default_app(),
            plugins: Vec::new(),
        }
    }
}

impl Config {
    /// Default configuration rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::default().with_root(root)
    }

    /// Load the configuration for a project.
    ///
    /// `path` is resolved against `root` when relative. A missing file is not
    /// an error: every key has a default.
    pub fn load(root: impl Into<PathBuf>, path: impl AsRef<Path>) -> Result<Self> {
        let root = root.into();
        let path = root.join(path.as_ref());

        if !path.exists() {
            return Ok(Self::new(root));
        }

        Ok(AstoundToml::open(&path)?.into_config().with_root(root))
    }

    /// Parse from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
        config.validate(content, filename)?;
        Ok(config)
    }

    /// Replace the project root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<public>`
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.public)
    }

    /// `<root>/<app>`
    pub fn app_dir(&self) -> PathBuf {
        self.root.join(&self.app)
    }

    /// `<root>/<public>/.astound`
    pub fn output_root(&self) -> PathBuf {
        self.public_dir().join(OUTPUT_ROOT)
    }

    /// `<root>/<public>/.astound/js`
    pub fn output_dir(&self) -> PathBuf {
        self.output_root().join(OUTPUT_JS)
    }

    /// `<root>/<public>/.astound/client.json`
    pub fn cache_file(&self) -> PathBuf {
        self.output_root().join(CACHE_FILE)
    }

    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        for (key, dir) in [("public", &self.public), ("app", &self.app)] {
            if let Some(reason) = invalid_dir(dir) {
                return Err(Error::validation(
                    format!("invalid {key} directory '{}'", dir.display()),
                    Some(reason.to_string()),
                    src,
                    filename,
                    key,
                ));
            }
        }

        if self.public == self.app {
            return Err(Error::validation(
                "public and app must be different directories",
                Some("build output is written inside the public directory".to_string()),
                src,
                filename,
                "app",
            ));
        }

        if self.plugins.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::validation(
                "plugin references must not be empty",
                None,
                src,
                filename,
                "plugins",
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, CONFIG_FILE)
    }
}

fn invalid_dir(dir: &Path) -> Option<&'static str> {
    if dir.as_os_str().is_empty() {
        return Some("directory must not be empty");
    }
    if dir.is_absolute() {
        return Some("directory must be relative to the project root");
    }
    if dir.components().any(|c| matches!(c, Component::ParentDir)) {
        return Some("directory must stay inside the project root");
    }
    None
}
