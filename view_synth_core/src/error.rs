//! Error types raised while resolving, rendering and emitting views.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::names::QualifiedName;

/// Errors produced by the view synthesis pipeline.
///
/// Resolution never lets these escape a single target: the engine turns them
/// into [`crate::Diagnostic`]s and moves on to the next request. They surface
/// directly only from the configuration loader and the build-script
/// [`crate::Generator`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ViewError {
    /// Malformed request: unresolvable target or config type, invalid
    /// visibility combination, conflicting property definitions.
    #[error("invalid view configuration for '{target}': {message}")]
    Configuration {
        /// Target type of the offending request.
        target: QualifiedName,
        /// Human-readable explanation.
        message: String,
    },

    /// A static function bound as an extractor has the wrong shape.
    #[error("{message}")]
    ExtractorValidation {
        /// Name of the function as declared.
        function: String,
        /// Human-readable explanation including the expected signature.
        message: String,
    },

    /// An include or exclude pattern is not a valid regular expression.
    #[error("invalid member pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern as written in the request.
        pattern: String,
        /// Underlying compilation failure.
        #[source]
        source: Box<regex::Error>,
    },

    /// Unknown visibility keyword.
    #[error("unknown access level '{0}'; expected one of none, private, package, protected, public")]
    UnknownAccess(String),

    /// A qualified name could not be parsed.
    #[error("invalid qualified name '{0}'")]
    InvalidName(String),

    /// A name that has to become a Rust identifier cannot be one.
    #[error("'{0}' is not a valid Rust identifier")]
    InvalidIdentifier(String),

    /// A type could not be parsed.
    #[error("invalid type '{source_text}': {message}")]
    InvalidType {
        /// Text that failed to parse.
        source_text: String,
        /// Parser message.
        message: String,
    },

    /// Rendering produced tokens that are not a valid item list.
    #[error("failed to render view '{view}': {message}")]
    Render {
        /// Generated type being rendered.
        view: QualifiedName,
        /// Explanation.
        message: String,
    },

    /// The emission sink failed.
    #[error("failed to emit view '{view}': {source}")]
    Emit {
        /// Generated type being written.
        view: QualifiedName,
        /// Underlying failure.
        #[source]
        source: EmitError,
    },

    /// A source file could not be parsed by the source adapter.
    #[error("failed to parse '{path}': {message}")]
    Parse {
        /// File being read.
        path: Utf8PathBuf,
        /// Parser or attribute error message.
        message: String,
    },

    /// I/O failure reading sources.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Engine configuration could not be gathered.
    #[error("failed to load view_synth configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A round finished with ERROR diagnostics.
    #[error("view generation reported {count} error(s):\n{summary}")]
    Failed {
        /// Number of ERROR diagnostics.
        count: usize,
        /// One line per error.
        summary: String,
    },
}

/// Failures writing a generated unit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// Filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being written.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Rendered tokens did not parse as a Rust file.
    #[error("generated tokens are not a valid Rust file: {0}")]
    Syntax(#[from] syn::Error),
}

impl ViewError {
    /// Shorthand for [`ViewError::Configuration`].
    #[must_use]
    pub fn configuration(target: &QualifiedName, message: impl Into<String>) -> Self {
        Self::Configuration {
            target: target.clone(),
            message: message.into(),
        }
    }

    /// Shorthand for [`ViewError::ExtractorValidation`].
    #[must_use]
    pub fn extractor(function: &str, message: impl Into<String>) -> Self {
        Self::ExtractorValidation {
            function: function.to_owned(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ViewError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
