//! Qualified type names.
//!
//! A [`QualifiedName`] is the module path of a type followed by its simple
//! name, e.g. `crate::model::Person`. Names order lexicographically by their
//! `::`-joined form, which is what priority resolution compares.

use std::cmp::Ordering;
use std::fmt;

use proc_macro2::Span;

use crate::error::ViewError;
use crate::types::path_segment;

/// Module path plus simple name of a type.
///
/// # Examples
///
/// ```
/// use view_synth_core::QualifiedName;
///
/// let name = QualifiedName::parse("crate::model::Person").expect("valid name");
/// assert_eq!(name.simple_name(), "Person");
/// assert_eq!(name.module(), ["crate", "model"]);
/// assert_eq!(name.sibling("PersonView").to_string(), "crate::model::PersonView");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    module: Vec<String>,
    name: String,
}

impl QualifiedName {
    /// Builds a name from a module path and a simple name.
    #[must_use]
    pub fn new<I, S>(module: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            module: module.into_iter().map(Into::into).collect(),
            name: name.into(),
        }
    }

    /// Parses a `::`-separated path.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidName`] when the path is empty or contains
    /// an empty segment.
    pub fn parse(path: &str) -> Result<Self, ViewError> {
        let mut segments: Vec<String> = path.split("::").map(|s| s.trim().to_owned()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ViewError::InvalidName(path.to_owned()));
        }
        let name = segments
            .pop()
            .ok_or_else(|| ViewError::InvalidName(path.to_owned()))?;
        Ok(Self {
            module: segments,
            name,
        })
    }

    /// Resolves a path as written inside `scope` to a qualified name.
    ///
    /// `crate::` paths are taken as absolute; `self::` and `super::` are
    /// interpreted relative to `scope`; any other path is treated as local to
    /// `scope`. Returns `None` for paths that climb above the root or carry
    /// generic arguments.
    #[must_use]
    pub fn resolve_path(scope: &[String], path: &syn::Path) -> Option<Self> {
        if path.segments.iter().any(|s| !s.arguments.is_none()) {
            return None;
        }
        let mut idents = path.segments.iter().map(|s| s.ident.to_string());
        let first = idents.next()?;
        let mut module: Vec<String> = match first.as_str() {
            "crate" => vec![first],
            "self" => scope.to_vec(),
            "super" => {
                let mut parent = scope.to_vec();
                parent.pop()?;
                parent
            }
            _ => {
                let mut local = scope.to_vec();
                local.push(first);
                local
            }
        };
        for ident in idents {
            if ident == "super" {
                module.pop()?;
            } else {
                module.push(ident);
            }
        }
        let name = module.pop()?;
        Some(Self { module, name })
    }

    /// Module segments leading to the type.
    #[must_use]
    pub fn module(&self) -> &[String] {
        &self.module
    }

    /// The type's own name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// A name in the same module with a different simple name.
    #[must_use]
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self {
            module: self.module.clone(),
            name: name.into(),
        }
    }

    /// The same simple name placed in another module.
    #[must_use]
    pub fn relocate(&self, module: &[String]) -> Self {
        Self {
            module: module.to_vec(),
            name: self.name.clone(),
        }
    }

    /// Renders the path needed to name this type from code living in `scope`.
    ///
    /// Types in `scope` itself are referred to by their simple name; other
    /// types are spelled out in full.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidIdentifier`] when a segment cannot be
    /// written as an identifier.
    pub fn path_from(&self, scope: &[String]) -> Result<syn::Path, ViewError> {
        let segments: Vec<&str> = if self.module == scope {
            vec![self.name.as_str()]
        } else {
            self.module
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(self.name.as_str()))
                .collect()
        };
        let mut path = syn::Path {
            leading_colon: None,
            segments: syn::punctuated::Punctuated::new(),
        };
        for segment in segments {
            path.segments
                .push(syn::PathSegment::from(path_segment(segment, Span::call_site())?));
        }
        Ok(path)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.module {
            write!(f, "{segment}::")?;
        }
        f.write_str(&self.name)
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
