use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for registry operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Holds the registry text and its file name so every diagnostic can point
/// back into the document.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create an XML syntax error at a byte offset.
    pub fn xml_error(&self, source: quick_xml::Error, offset: usize) -> Box<Error> {
        Box::new(Error::Xml {
            src: self.named_source(),
            span: (offset, 0).into(),
            source,
        })
    }

    /// Create a malformed-element error without a span.
    pub fn malformed(&self, message: impl Into<String>) -> Box<Error> {
        Box::new(Error::Malformed {
            src: self.named_source(),
            span: None,
            message: message.into(),
        })
    }

    /// Create a malformed-element error with a span.
    pub fn malformed_at(&self, message: impl Into<String>, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::Malformed {
            src: self.named_source(),
            span: Some(span.into()),
            message: message.into(),
        })
    }

    pub fn unknown_alias(
        &self,
        name: impl Into<String>,
        alias: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::UnknownAlias {
            src: self.named_source(),
            span: span.into(),
            name: name.into(),
            alias: alias.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("pass the registry location with '--registry <path>'"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry XML")]
    #[diagnostic(code(vkdgen::xml_error))]
    Xml {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: SourceSpan,
        #[source]
        source: quick_xml::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(vkdgen::malformed))]
    Malformed {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("command '{name}' aliases unknown command '{alias}'")]
    #[diagnostic(code(vkdgen::unknown_alias))]
    UnknownAlias {
        #[source_code]
        src: NamedSource<String>,
        #[label("alias declared here")]
        span: SourceSpan,
        name: String,
        alias: String,
    },

    #[error("extension '{name}' is not available for API '{api}'")]
    #[diagnostic(
        code(vkdgen::unknown_extension),
        help("extension names are case-sensitive, e.g. 'VK_KHR_surface'")
    )]
    UnknownExtension { name: String, api: String },
}
