//! Client loader generation.
//!
//! Every page gets a `<hash>.client.js` that mounts the page HTML into the
//! document as soon as it executes. The script is four blocks joined into
//! one:
//!
//! 1. the render routine, run immediately and registered in
//!    `window.astound.load[pathname]` for client-side navigation
//! 2. the `addlistener` helper, which rewires navigation after each render
//! 3. a marker comment
//! 4. a `load` handler injecting the worker scripts as modules

use astound_config::{OUTPUT_ROOT, PUBLIC_JS_PREFIX};

const RENDER: &str = include_str!("render.js");
const LISTENER: &str = include_str!("listener.js");

/// Separates the emitted blocks.
pub const SEPARATOR: &str = "/*    */";

/// Marker placed between the listener helper and the worker hook.
pub const MARKER: &str = "/*renderer*/";

/// A global script contributed by a plugin and loaded on every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerScript {
    pub name: Option<String>,
    /// Public URL path of the script.
    pub script: String,
}

impl WorkerScript {
    /// Worker script served from `w.<hash>.js` in the output directory.
    pub fn new(name: Option<String>, hash: &str) -> Self {
        Self {
            name,
            script: format!("{PUBLIC_JS_PREFIX}/{}", Self::file_name(hash)),
        }
    }

    pub fn file_name(hash: &str) -> String {
        format!("w.{hash}.js")
    }
}

/// Generate the loader script for a page with the given HTML.
pub fn generate_html(html: &str, scripts: &[WorkerScript]) -> String {
    [
        render_block(html),
        LISTENER.to_string(),
        MARKER.to_string(),
        load_block(scripts),
    ]
    .join(SEPARATOR)
}

fn render_block(html: &str) -> String {
    RENDER
        .replacen("__ASTOUND_RESERVED__", &format!("/{OUTPUT_ROOT}"), 1)
        .replacen("__ASTOUND_HTML__", &escape_template_literal(html), 1)
}

fn load_block(scripts: &[WorkerScript]) -> String {
    let injections = scripts
        .iter()
        .map(|script| {
            let src = serde_json::to_string(&script.script)
                .unwrap_or_else(|_| "\"\"".to_string());
            format!(
                "var e=document.createElement(\"script\");e.setAttribute(\"pagemodule\",\"\");\
                 e.setAttribute(\"src\",{src});e.setAttribute(\"type\",\"module\");\
                 document.body.appendChild(e);"
            )
        })
        .collect::<Vec<_>>()
        .join("/**/");

    format!("window.addEventListener(\"load\", function () {{{injections}}});")
}

/// Escape text for embedding in a JS template literal.
fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
