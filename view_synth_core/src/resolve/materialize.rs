//! Applies per-property customisations of the config type.
//!
//! Failures here are fatal to one property only: the property is dropped,
//! an ERROR is recorded and the message is kept for `view_errors()`.

use proc_macro2::Span;

use crate::access::Access;
use crate::diagnostics::Diagnostics;
use crate::error::ViewError;
use crate::extract::{Converter, ExtractContext, Extractor, StaticFunctionExtractor};
use crate::model::{Property, TypeInfo};
use crate::names::QualifiedName;
use crate::request::{ConfigBearer, NewProperty, PropertyOverride};
use crate::types::{TypeRef, ident};

/// Everything property customisation needs besides the property itself.
pub(super) struct Materializer<'a> {
    pub(super) target: &'a QualifiedName,
    pub(super) info: &'a TypeInfo,
    pub(super) config: &'a QualifiedName,
    pub(super) scope: &'a [String],
    pub(super) runtime: &'a syn::Path,
    pub(super) default_getters: Access,
}

impl Materializer<'_> {
    /// Applies the overrides and new properties of `bearer` to `properties`,
    /// returning the messages of the properties that were dropped.
    pub(super) fn apply(
        &self,
        bearer: &ConfigBearer,
        properties: &mut Vec<Property>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        for customisation in &bearer.overrides {
            let Some(index) = properties
                .iter()
                .position(|property| property.name() == customisation.name)
            else {
                if self.info.member(&customisation.name).is_none() {
                    diagnostics.warn(
                        Some(self.config),
                        Some(self.target),
                        format!(
                            "The property \"{}\" configured on \"{}\" does not exist in \"{}\".",
                            customisation.name, self.config, self.target
                        ),
                    );
                }
                continue;
            };
            let Some(property) = properties.get(index) else {
                continue;
            };
            match self.override_property(property, customisation) {
                Ok(updated) => {
                    if let Some(slot) = properties.get_mut(index) {
                        *slot = updated;
                    }
                }
                Err(err) => {
                    properties.remove(index);
                    self.record(&err, diagnostics, &mut errors);
                }
            }
        }
        for addition in &bearer.new_properties {
            match self.new_property(addition) {
                Ok(property) => properties.push(property),
                Err(err) => self.record(&err, diagnostics, &mut errors),
            }
        }
        errors
    }

    fn record(&self, err: &ViewError, diagnostics: &mut Diagnostics, errors: &mut Vec<String>) {
        let message = err.to_string();
        diagnostics.error(Some(self.config), Some(self.target), message.clone());
        errors.push(message);
    }

    /// Property names become field names of the view.
    fn check_name(&self, name: &str) -> Result<(), ViewError> {
        ident(name, Span::call_site()).map(drop).map_err(|_| {
            ViewError::configuration(
                self.target,
                format!("the property name \"{name}\" is not a valid Rust identifier"),
            )
        })
    }

    const fn context(&self) -> ExtractContext<'_> {
        ExtractContext {
            target: self.target,
        }
    }

    fn override_property(
        &self,
        property: &Property,
        customisation: &PropertyOverride,
    ) -> Result<Property, ViewError> {
        let mut property = property.clone();
        if let Some(getter) = customisation.getter {
            property = property.with_getter_access(getter);
        }
        if let Some(setter) = customisation.setter {
            if !setter.is_none() && !property.is_writable() {
                return Err(ViewError::configuration(
                    self.target,
                    format!(
                        "the property \"{}\" is read-only and cannot have a setter",
                        property.name()
                    ),
                ));
            }
            property = property.with_setter_access(setter);
        }
        if let Some(function) = &customisation.extractor {
            let extractor =
                Extractor::StaticFunction(StaticFunctionExtractor::new(function.clone()));
            extractor.validate(self.context(), Some(&property))?;
            property = property.with_extractor(extractor);
        }
        if let Some(requested) = &customisation.converter {
            if property.extractor().is_some() {
                return Err(ViewError::configuration(
                    self.target,
                    format!(
                        "the property \"{}\" is computed by a function and cannot use a converter",
                        property.name()
                    ),
                ));
            }
            let converter = Converter::bind(
                requested.path.clone(),
                property.declared_type().clone(),
                requested.output.clone(),
                self.runtime.clone(),
            );
            let output = converter.output().clone();
            property = property.with_converter(converter).with_type(output, None);
        }
        if let Some(view) = &customisation.view {
            if property.extractor().is_some() {
                return Err(ViewError::configuration(
                    self.target,
                    format!(
                        "the property \"{}\" is computed by a function and cannot be projected into \"{view}\"",
                        property.name()
                    ),
                ));
            }
            property =
                property.with_type(TypeRef::of_name(view, self.scope)?, Some(view.clone()));
        }
        if customisation.comment.is_some() {
            property = property.with_comment(customisation.comment.clone());
        }
        if let Some(rename) = &customisation.rename {
            self.check_name(rename)?;
            property = property.with_name(rename.clone());
        }
        Ok(property)
    }

    fn new_property(&self, addition: &NewProperty) -> Result<Property, ViewError> {
        self.check_name(&addition.name)?;
        if addition.setter.is_some_and(|setter| !setter.is_none()) {
            return Err(ViewError::configuration(
                self.target,
                format!(
                    "the property \"{}\" is computed by a function and cannot have a setter",
                    addition.name
                ),
            ));
        }
        let extractor = StaticFunctionExtractor::new(addition.function.clone());
        Extractor::StaticFunction(extractor.clone()).validate(self.context(), None)?;
        Ok(Property::computed(
            addition.name.clone(),
            extractor,
            addition.getter.unwrap_or(self.default_getters),
        ))
    }
}
