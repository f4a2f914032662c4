use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for configuration operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(astound::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse astound.toml")]
    #[diagnostic(code(astound::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(astound::validation_error))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl Error {
    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a validation error, pointing at `key` when it appears in the source
    pub fn validation(
        message: impl Into<String>,
        help: Option<String>,
        src: &str,
        filename: &str,
        key: &str,
    ) -> Box<Self> {
        Box::new(Error::Validation {
            src: NamedSource::new(filename, src.to_string()),
            span: find_key_span(src, key),
            message: message.into(),
            help,
        })
    }
}

/// Locate a top-level `key = ...` assignment in the source.
fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    let mut offset = 0;
    for line in src.lines() {
        let trimmed = line.trim_start();
        let assigns = trimmed
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if assigns {
            let start = offset + (line.len() - trimmed.len());
            return Some(SourceSpan::from((start, trimmed.len())));
        }
        offset += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_key_span() {
        let src = "public = \"www\"\n  app = \"/abs\"\n";
        let span = find_key_span(src, "app").expect("span");
        assert_eq!(span.offset(), 17);
        assert_eq!(span.len(), "app = \"/abs\"".len());
    }

    #[test]
    fn test_find_key_span_ignores_prefixes() {
        let src = "application = 1\n";
        assert!(find_key_span(src, "app").is_none());
    }
}
