//! Type references carried by members and properties.

use std::fmt;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{ToTokens, quote};
use syn::ext::IdentExt;

use crate::error::ViewError;
use crate::names::QualifiedName;

/// A Rust type as written in source, compared structurally.
///
/// Equality ignores spans and whitespace, so `Option<u32>` written in two
/// places compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(syn::Type);

impl TypeRef {
    /// Wraps an already parsed type.
    #[must_use]
    pub const fn new(ty: syn::Type) -> Self {
        Self(ty)
    }

    /// Parses a type from its source text.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidType`] when `source` is not a Rust type.
    pub fn parse(source: &str) -> Result<Self, ViewError> {
        syn::parse_str(source)
            .map(Self)
            .map_err(|err| ViewError::InvalidType {
                source_text: source.to_owned(),
                message: err.to_string(),
            })
    }

    /// The type naming `name` as seen from `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidIdentifier`] when a segment of `name` is
    /// not an identifier.
    pub fn of_name(name: &QualifiedName, scope: &[String]) -> Result<Self, ViewError> {
        let path = name.path_from(scope)?;
        Ok(Self(syn::Type::Path(syn::TypePath { qself: None, path })))
    }

    /// The underlying `syn` type.
    #[must_use]
    pub const fn as_syn(&self) -> &syn::Type {
        &self.0
    }

    /// Returns `false` for types a view field cannot hold: unit, never,
    /// `impl Trait`, inferred and bare references.
    #[must_use]
    pub fn is_storable(&self) -> bool {
        match &self.0 {
            syn::Type::Tuple(tuple) => !tuple.elems.is_empty(),
            syn::Type::Never(_)
            | syn::Type::ImplTrait(_)
            | syn::Type::Infer(_)
            | syn::Type::Reference(_) => false,
            syn::Type::Paren(inner) => Self(*inner.elem.clone()).is_storable(),
            _ => true,
        }
    }

    /// Returns `true` when this type is `&T` for the type `target`, with
    /// the path interpreted from `scope`.
    #[must_use]
    pub fn is_shared_ref_to(&self, target: &QualifiedName, scope: &[String]) -> bool {
        let syn::Type::Reference(reference) = &self.0 else {
            return false;
        };
        if reference.mutability.is_some() {
            return false;
        }
        let syn::Type::Path(path) = reference.elem.as_ref() else {
            return false;
        };
        path.qself.is_none()
            && QualifiedName::resolve_path(scope, &path.path).is_some_and(|name| &name == target)
    }
}

impl From<syn::Type> for TypeRef {
    fn from(ty: syn::Type) -> Self {
        Self(ty)
    }
}

impl ToTokens for TypeRef {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.0.to_tokens(tokens);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = &self.0;
        let rendered = quote!(#ty).to_string();
        f.write_str(&tidy(&rendered))
    }
}

/// Collapses the spacing `proc_macro2` inserts around punctuation so types
/// read naturally in diagnostics.
fn tidy(rendered: &str) -> String {
    rendered
        .replace(" :: ", "::")
        .replace(" < ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace("& ", "&")
        .replace(" ,", ",")
}

/// Keywords that name a path root and can never be raw identifiers.
const PATH_KEYWORDS: [&str; 4] = ["crate", "self", "super", "Self"];

/// Builds an identifier, falling back to a raw identifier for keywords.
///
/// A leading `r#` is accepted and ignored.
///
/// # Errors
///
/// Returns [`ViewError::InvalidIdentifier`] when `name` is not a single Rust
/// identifier, or is `_` or a path keyword, neither of which can be raw.
pub fn ident(name: &str, span: Span) -> Result<Ident, ViewError> {
    let bare = unraw(name);
    if let Ok(mut parsed) = syn::parse_str::<Ident>(bare) {
        parsed.set_span(span);
        return Ok(parsed);
    }
    let keyword = syn::parse::Parser::parse_str(Ident::parse_any, bare).is_ok();
    if keyword && bare != "_" && !PATH_KEYWORDS.contains(&bare) {
        Ok(Ident::new_raw(bare, span))
    } else {
        Err(ViewError::InvalidIdentifier(name.to_owned()))
    }
}

/// Builds one segment of a path, where `crate`, `self`, `super` and `Self`
/// are allowed as written.
///
/// # Errors
///
/// Returns [`ViewError::InvalidIdentifier`] under the same conditions as
/// [`ident`].
pub fn path_segment(name: &str, span: Span) -> Result<Ident, ViewError> {
    if PATH_KEYWORDS.contains(&name) {
        Ok(Ident::new(name, span))
    } else {
        ident(name, span)
    }
}

/// Strips a raw-identifier prefix.
#[must_use]
pub fn unraw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}
