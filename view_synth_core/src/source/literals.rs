//! Literal parsing helpers for `#[view_of]` and `#[view_property]`.

use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Lit, LitStr, Token, parenthesized};

use crate::access::Access;
use crate::names::QualifiedName;
use crate::request::TypeSelector;
use crate::types::TypeRef;

/// Parses `key = <literal>` using `extractor`, naming `expected` on mismatch.
fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

pub(super) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

pub(super) fn lit_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    parse_lit(meta, key, "boolean", |lit| match lit {
        Lit::Bool(b) => Some(b.value),
        _ => None,
    })
}

/// Parses `key = "public"` and friends.
pub(super) fn lit_access(meta: &ParseNestedMeta, key: &str) -> syn::Result<Access> {
    let lit = lit_str(meta, key)?;
    lit.value()
        .parse()
        .map_err(|err: crate::error::ViewError| syn::Error::new(lit.span(), err.to_string()))
}

/// Parses `key = "Type"`.
pub(super) fn lit_type(meta: &ParseNestedMeta, key: &str) -> syn::Result<TypeRef> {
    let lit = lit_str(meta, key)?;
    lit.parse::<syn::Type>().map(TypeRef::new)
}

/// Parses `key("a", "b")`.
pub(super) fn lit_list(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let content;
    parenthesized!(content in meta.input);
    let items = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(items.iter().map(LitStr::value).collect())
}

/// Parses `key = path::To::Type`, resolving it from `scope`.
pub(super) fn type_path(meta: &ParseNestedMeta, scope: &[String]) -> syn::Result<QualifiedName> {
    let path: syn::Path = meta.value()?.parse()?;
    QualifiedName::resolve_path(scope, &path)
        .ok_or_else(|| syn::Error::new_spanned(&path, "expected a path to a non-generic type"))
}

/// Parses `key = Self` or `key = path::To::Type`.
pub(super) fn type_selector(meta: &ParseNestedMeta, scope: &[String]) -> syn::Result<TypeSelector> {
    let path: syn::Path = meta.value()?.parse()?;
    if path.is_ident("Self") {
        return Ok(TypeSelector::SelfType);
    }
    QualifiedName::resolve_path(scope, &path)
        .map(TypeSelector::Named)
        .ok_or_else(|| syn::Error::new_spanned(&path, "expected `Self` or a path to a non-generic type"))
}

/// Parses `key = "a::b"` as a module path resolved from `scope`.
pub(super) fn module_path(meta: &ParseNestedMeta, key: &str, scope: &[String]) -> syn::Result<Vec<String>> {
    let lit = lit_str(meta, key)?;
    let path: syn::Path = lit.parse()?;
    let resolved = QualifiedName::resolve_path(scope, &path)
        .ok_or_else(|| syn::Error::new(lit.span(), format!("{key} must be a module path")))?;
    let mut module = resolved.module().to_vec();
    module.push(resolved.simple_name().to_owned());
    Ok(module)
}
