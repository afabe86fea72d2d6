//! Post-extraction value conversion.

use proc_macro2::TokenStream;
use quote::quote;

use crate::types::TypeRef;

/// A converter bound to the type it receives.
///
/// Generated code calls
/// `<Path as runtime::PropertyConverter<Input>>::convert(value)`; the view
/// exposes [`Converter::output`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    path: syn::Path,
    input: TypeRef,
    output: TypeRef,
    runtime: syn::Path,
}

impl Converter {
    /// Binds the converter type at `path` to values of type `input`.
    ///
    /// When `output` is `None` the exposed type is the trait's associated
    /// `Output` type.
    #[must_use]
    pub fn bind(path: syn::Path, input: TypeRef, output: Option<TypeRef>, runtime: syn::Path) -> Self {
        let output = output.unwrap_or_else(|| {
            TypeRef::new(syn::parse_quote! {
                <#path as #runtime::PropertyConverter<#input>>::Output
            })
        });
        Self {
            path,
            input,
            output,
            runtime,
        }
    }

    /// Path of the converter type.
    #[must_use]
    pub const fn path(&self) -> &syn::Path {
        &self.path
    }

    /// Type fed into the converter.
    #[must_use]
    pub const fn input(&self) -> &TypeRef {
        &self.input
    }

    /// Type the converter produces.
    #[must_use]
    pub const fn output(&self) -> &TypeRef {
        &self.output
    }

    /// Wraps `value` in a conversion call.
    #[must_use]
    pub fn render(&self, value: &TokenStream) -> TokenStream {
        let Self {
            path,
            input,
            runtime,
            ..
        } = self;
        quote! { <#path as #runtime::PropertyConverter<#input>>::convert(#value) }
    }
}
