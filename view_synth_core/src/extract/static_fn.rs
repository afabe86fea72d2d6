//! Extraction through a user-supplied associated function.

use proc_macro2::{Span, TokenStream};
use quote::quote;

use super::ExtractContext;
use crate::error::ViewError;
use crate::model::Property;
use crate::names::QualifiedName;
use crate::types::{TypeRef, ident};

/// Signature of a function declared on a configuration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    /// Type whose `impl` block declares the function.
    pub container: QualifiedName,
    /// Function name.
    pub name: String,
    /// Whether the function takes a `self` receiver.
    pub has_receiver: bool,
    /// Parameter types in order, receiver excluded.
    pub params: Vec<TypeRef>,
    /// Declared return type; `()` when omitted.
    pub return_type: TypeRef,
    /// Documentation text.
    pub comment: Option<String>,
}

impl FunctionSig {
    /// A receiver-less function with the given parameters.
    #[must_use]
    pub fn new(
        container: QualifiedName,
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            container,
            name: name.into(),
            has_receiver: false,
            params,
            return_type,
            comment: None,
        }
    }
}

/// Computes a property by calling `Container::function(source)` or
/// `Container::function()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFunctionExtractor {
    function: FunctionSig,
}

impl StaticFunctionExtractor {
    /// Binds to `function`. Call [`super::Extractor::validate`] before use.
    #[must_use]
    pub const fn new(function: FunctionSig) -> Self {
        Self { function }
    }

    /// The bound function.
    #[must_use]
    pub const fn function(&self) -> &FunctionSig {
        &self.function
    }

    pub(super) const fn return_type(&self) -> &TypeRef {
        &self.function.return_type
    }

    pub(super) fn takes_no_source(&self) -> bool {
        self.function.params.is_empty()
    }

    pub(super) fn validate(
        &self,
        context: ExtractContext<'_>,
        property: Option<&Property>,
    ) -> Result<(), ViewError> {
        let FunctionSig {
            name,
            has_receiver,
            params,
            return_type,
            container,
            ..
        } = &self.function;
        if *has_receiver {
            return Err(ViewError::extractor(
                name,
                format!("The property function \"{name}\" should be static; remove its self receiver."),
            ));
        }
        if !return_type.is_storable() {
            return Err(ViewError::extractor(
                name,
                format!("The property function \"{name}\" should return a valid owned type."),
            ));
        }
        if let Some(expected) = property.map(Property::declared_type)
            && expected != return_type
        {
            return Err(ViewError::extractor(
                name,
                format!("The property function \"{name}\" should return a \"{expected}\" type."),
            ));
        }
        let target = context.target.simple_name();
        let signature = format!(
            "\"fn {name}() -> {return_type}\" or \"fn {name}(source: &{target}) -> {return_type}\""
        );
        match params.as_slice() {
            [] => Ok(()),
            [param] if param.is_shared_ref_to(context.target, container.module()) => Ok(()),
            [_] => Err(ViewError::extractor(
                name,
                format!(
                    "The property function \"{name}\" has a wrong parameter. It should look like {signature}."
                ),
            )),
            _ => Err(ViewError::extractor(
                name,
                format!(
                    "The property function \"{name}\" has too many parameters. It should look like {signature}."
                ),
            )),
        }
    }

    pub(super) fn render(
        &self,
        scope: &[String],
        source: &TokenStream,
    ) -> Result<TokenStream, ViewError> {
        let container = self.function.container.path_from(scope)?;
        let function = ident(&self.function.name, Span::call_site())?;
        Ok(if self.takes_no_source() {
            quote! { #container::#function() }
        } else {
            quote! { #container::#function(#source) }
        })
    }
}
