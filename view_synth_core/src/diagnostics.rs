//! Diagnostics accumulated during a round.
//!
//! Every diagnostic is also forwarded to `tracing`, so hosts that install a
//! subscriber see them as they happen.

use std::fmt;

use crate::names::QualifiedName;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Benign conflict; generation of one request was skipped.
    Warning,
    /// Validation failure; the build should fail.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One message on the diagnostics channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Human-readable text.
    pub message: String,
    /// Configuration-bearing type the message is attributed to.
    pub origin: Option<QualifiedName>,
    /// Target type whose resolution produced the message.
    pub target: Option<QualifiedName>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(origin) = &self.origin {
            write!(f, " (configured on {origin})")?;
        }
        Ok(())
    }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Records a warning.
    pub fn warn(
        &mut self,
        origin: Option<&QualifiedName>,
        target: Option<&QualifiedName>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        tracing::warn!(
            origin = ?origin.map(ToString::to_string),
            target = ?target.map(ToString::to_string),
            "{message}"
        );
        self.push(Severity::Warning, origin, target, message);
    }

    /// Records an error.
    pub fn error(
        &mut self,
        origin: Option<&QualifiedName>,
        target: Option<&QualifiedName>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        tracing::error!(
            origin = ?origin.map(ToString::to_string),
            target = ?target.map(ToString::to_string),
            "{message}"
        );
        self.push(Severity::Error, origin, target, message);
    }

    fn push(
        &mut self,
        severity: Severity,
        origin: Option<&QualifiedName>,
        target: Option<&QualifiedName>,
        message: String,
    ) {
        self.entries.push(Diagnostic {
            severity,
            message,
            origin: origin.cloned(),
            target: target.cloned(),
        });
    }

    /// Appends every entry of `other`.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Iterates entries in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Iterates entries of one severity.
    pub fn of(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.severity == severity)
    }

    /// Returns `true` when an error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.of(Severity::Error).next().is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
