//! Identifier mapping for generated fields and accessors.

use std::collections::HashSet;

use proc_macro2::{Ident, Span};
use quote::format_ident;

use crate::error::ViewError;
use crate::model::Property;
use crate::types::{ident, unraw};

/// Methods every view may define; getters colliding with them are prefixed.
const RESERVED: [&str; 4] = ["empty", "new", "from_source", "view_errors"];

/// Field, getter and setter identifiers for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberNames {
    /// Backing field, also used as constructor parameter name.
    pub field: Ident,
    /// Getter method.
    pub getter: Ident,
    /// Setter method.
    pub setter: Ident,
}

impl MemberNames {
    /// Maps a property name onto identifiers.
    ///
    /// Keywords become raw identifiers (`r#type`); getters that would shadow
    /// a generated constructor are renamed `get_<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidIdentifier`] when the property name cannot
    /// be a field name.
    pub fn for_property(property: &Property) -> Result<Self, ViewError> {
        let span = Span::call_site();
        let name = property.name();
        let field = ident(name, span)?;
        let bare = unraw(name);
        let getter = if RESERVED.contains(&bare) {
            format_ident!("get_{}", bare)
        } else {
            field.clone()
        };
        let setter = format_ident!("set_{}", bare);
        Ok(Self {
            field,
            getter,
            setter,
        })
    }
}

/// Returns the first method name generated twice for `properties`.
pub(crate) fn duplicate_method<'a, I>(properties: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a Property, &'a MemberNames)>,
{
    let mut seen: HashSet<String> = RESERVED.iter().map(|s| (*s).to_owned()).collect();
    for (property, names) in properties {
        let mut methods = Vec::new();
        if property.has_getter() {
            methods.push(names.getter.to_string());
        }
        if property.has_setter() {
            methods.push(names.setter.to_string());
        }
        for method in methods {
            if !seen.insert(method.clone()) {
                return Some(method);
            }
        }
    }
    None
}
