//! Parsing of the `#[view_of]`, `#[view_property]` and `#[view_meta]` helper
//! attributes.
//!
//! ```text
//! #[view_meta(target = Person)]
//! #[view_of(target = Person, includes("name", "age"), setters = "public")]
//! #[view_property(name = "age", converter = NoneAsZero, getter = "package")]
//! struct PersonConfig;
//!
//! impl PersonConfig {
//!     #[view_property(new = "initials")]
//!     fn initials(source: &Person) -> String { ... }
//! }
//! ```

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Meta};

use super::literals::{
    lit_access, lit_bool, lit_list, lit_str, lit_type, module_path, type_path, type_selector,
};
use crate::access::Access;
use crate::request::{ConverterSpec, MetaRequest, PropertyOverride, ViewRequest};

/// Helper attribute requesting a view.
pub const VIEW_OF: &str = "view_of";

/// Helper attribute customising a property.
pub const VIEW_PROPERTY: &str = "view_property";

/// Helper attribute requesting a meta type of member-name constants.
pub const VIEW_META: &str = "view_meta";

/// Returns `true` when `attr` is the helper `name`, however it is imported.
pub(crate) fn is_helper(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// Removes every helper attribute from `attrs`.
pub(crate) fn strip_helpers(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| {
        !is_helper(attr, VIEW_OF) && !is_helper(attr, VIEW_PROPERTY) && !is_helper(attr, VIEW_META)
    });
}

fn key(meta: &ParseNestedMeta) -> String {
    meta.path
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn unsupported(meta: &ParseNestedMeta, attr: &str, key: &str) -> syn::Error {
    meta.error(format!("unsupported {attr} option `{key}`"))
}

/// Parses one `#[view_of(...)]` written in `scope`.
pub(crate) fn parse_view_of(attr: &Attribute, scope: &[String]) -> syn::Result<ViewRequest> {
    let mut request = ViewRequest::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(request);
    }
    attr.parse_nested_meta(|meta| {
        let key = key(&meta);
        match key.as_str() {
            "target" => request.target = type_selector(&meta, scope)?,
            "config" => request.config = type_selector(&meta, scope)?,
            "gen_module" => request.gen_module = Some(module_path(&meta, &key, scope)?),
            "gen_name" => request.gen_name = Some(lit_str(&meta, &key)?.value()),
            "access" => request.type_access = lit_access(&meta, &key)?,
            "empty_ctor" => request.empty_ctor = lit_access(&meta, &key)?,
            "fields_ctor" => request.fields_ctor = lit_access(&meta, &key)?,
            "copy_ctor" => request.copy_ctor = lit_access(&meta, &key)?,
            "getters" => request.getters = lit_access(&meta, &key)?,
            "setters" => request.setters = lit_access(&meta, &key)?,
            "includes" => request.includes.extend(lit_list(&meta)?),
            "excludes" => request.excludes.extend(lit_list(&meta)?),
            "include_pattern" => request.include_pattern = Some(lit_str(&meta, &key)?.value()),
            "exclude_pattern" => request.exclude_pattern = Some(lit_str(&meta, &key)?.value()),
            "error_methods" => request.error_methods = lit_bool(&meta, &key)?,
            _ => return Err(unsupported(&meta, VIEW_OF, &key)),
        }
        Ok(())
    })?;
    Ok(request)
}

/// Parses one `#[view_meta(...)]` written in `scope`.
pub(crate) fn parse_view_meta(attr: &Attribute, scope: &[String]) -> syn::Result<MetaRequest> {
    let mut request = MetaRequest::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(request);
    }
    attr.parse_nested_meta(|meta| {
        let key = key(&meta);
        match key.as_str() {
            "target" => request.target = type_selector(&meta, scope)?,
            "gen_module" => request.gen_module = Some(module_path(&meta, &key, scope)?),
            "gen_name" => request.gen_name = Some(lit_str(&meta, &key)?.value()),
            "access" => request.type_access = lit_access(&meta, &key)?,
            _ => return Err(unsupported(&meta, VIEW_META, &key)),
        }
        Ok(())
    })?;
    Ok(request)
}

/// Parses a struct-level `#[view_property(name = "...", ...)]`.
pub(crate) fn parse_property_override(
    attr: &Attribute,
    scope: &[String],
) -> syn::Result<PropertyOverride> {
    let mut property = PropertyOverride::default();
    let mut converter: Option<syn::Path> = None;
    let mut converter_output = None;
    attr.parse_nested_meta(|meta| {
        let key = key(&meta);
        match key.as_str() {
            "name" => property.name = lit_str(&meta, &key)?.value(),
            "rename" => property.rename = Some(lit_str(&meta, &key)?.value()),
            "getter" => property.getter = Some(lit_access(&meta, &key)?),
            "setter" => property.setter = Some(lit_access(&meta, &key)?),
            "converter" => converter = Some(meta.value()?.parse()?),
            "converter_output" => converter_output = Some(lit_type(&meta, &key)?),
            "view" => property.view = Some(type_path(&meta, scope)?),
            "comment" => property.comment = Some(lit_str(&meta, &key)?.value()),
            _ => return Err(unsupported(&meta, VIEW_PROPERTY, &key)),
        }
        Ok(())
    })?;
    if property.name.is_empty() {
        return Err(syn::Error::new_spanned(
            attr,
            "view_property on a type needs `name = \"...\"` naming the member it adjusts",
        ));
    }
    match (converter, converter_output) {
        (Some(path), output) => property.converter = Some(ConverterSpec { path, output }),
        (None, Some(_)) => {
            return Err(syn::Error::new_spanned(
                attr,
                "`converter_output` requires `converter`",
            ));
        }
        (None, None) => {}
    }
    Ok(property)
}

/// A `#[view_property(...)]` found on an associated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FunctionProperty {
    /// `new = "name"`: the function computes an extra property.
    New {
        name: String,
        getter: Option<Access>,
        setter: Option<Access>,
    },
    /// `extract = "member"`: the function replaces the member's direct read.
    Extract { member: String },
}

/// Parses a function-level `#[view_property(new = "..." | extract = "...")]`.
pub(crate) fn parse_function_property(attr: &Attribute) -> syn::Result<FunctionProperty> {
    let mut new = None;
    let mut extract = None;
    let mut getter = None;
    let mut setter = None;
    attr.parse_nested_meta(|meta| {
        let key = key(&meta);
        match key.as_str() {
            "new" => new = Some(lit_str(&meta, &key)?.value()),
            "extract" => extract = Some(lit_str(&meta, &key)?.value()),
            "getter" => getter = Some(lit_access(&meta, &key)?),
            "setter" => setter = Some(lit_access(&meta, &key)?),
            _ => return Err(unsupported(&meta, VIEW_PROPERTY, &key)),
        }
        Ok(())
    })?;
    match (new, extract) {
        (Some(name), None) => Ok(FunctionProperty::New {
            name,
            getter,
            setter,
        }),
        (None, Some(member)) if getter.is_none() && setter.is_none() => {
            Ok(FunctionProperty::Extract { member })
        }
        (None, Some(_)) => Err(syn::Error::new_spanned(
            attr,
            "accessors of an extracted member are set on the type's view_property",
        )),
        _ => Err(syn::Error::new_spanned(
            attr,
            "view_property on a function needs exactly one of `new = \"...\"` or `extract = \"...\"`",
        )),
    }
}
