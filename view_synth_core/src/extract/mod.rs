//! Strategies producing a property's value.
//!
//! An [`Extractor`] computes the value of a property from a source instance;
//! a [`Converter`] adapts the extracted value to the type the view exposes.
//! Extractors form a closed set dispatched by variant; new strategies are
//! added as new variants.

mod convert;
mod static_fn;

use proc_macro2::TokenStream;
use quote::quote;

pub use convert::Converter;
pub use static_fn::{FunctionSig, StaticFunctionExtractor};

use crate::error::ViewError;
use crate::model::{Member, MemberKind, Property};
use crate::names::QualifiedName;
use crate::types::{TypeRef, ident};

/// Information an extractor validates against.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    /// The source type being viewed.
    pub target: &'a QualifiedName,
}

/// Reads a member straight off the source instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectExtractor {
    accessor: String,
    kind: MemberKind,
    return_type: TypeRef,
}

impl DirectExtractor {
    /// Direct read of `member`.
    #[must_use]
    pub fn for_member(member: &Member) -> Self {
        let accessor = match member.kind {
            MemberKind::Field => member.name.clone(),
            MemberKind::Method => member
                .getter_name
                .clone()
                .unwrap_or_else(|| member.name.clone()),
        };
        Self {
            accessor,
            kind: member.kind,
            return_type: member.declared_type.clone(),
        }
    }

    fn render(&self, source: &TokenStream) -> Result<TokenStream, ViewError> {
        let accessor = ident(&self.accessor, proc_macro2::Span::call_site())?;
        Ok(match self.kind {
            MemberKind::Field => quote! { ::core::clone::Clone::clone(&#source.#accessor) },
            MemberKind::Method => quote! { #source.#accessor() },
        })
    }
}

/// Strategy computing a property value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Extractor {
    /// Field read or accessor call on the source.
    Direct(DirectExtractor),
    /// Call to a user-supplied function without a receiver.
    StaticFunction(StaticFunctionExtractor),
}

impl Extractor {
    /// Type of the value the extractor yields.
    #[must_use]
    pub const fn return_type(&self) -> &TypeRef {
        match self {
            Self::Direct(direct) => &direct.return_type,
            Self::StaticFunction(function) => function.return_type(),
        }
    }

    /// Returns `true` when the value is recomputed on every read instead of
    /// being stored in the view.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::Direct(_) => false,
            Self::StaticFunction(function) => function.takes_no_source(),
        }
    }

    /// Checks that the extractor can produce `property`, or a new property
    /// when `property` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::ExtractorValidation`] naming the offending
    /// function when its shape is wrong.
    pub fn validate(
        &self,
        context: ExtractContext<'_>,
        property: Option<&Property>,
    ) -> Result<(), ViewError> {
        match self {
            Self::Direct(_) => Ok(()),
            Self::StaticFunction(function) => function.validate(context, property),
        }
    }

    /// Renders the expression yielding the value, reading from `source`.
    ///
    /// `scope` is the module of the generated type; paths to other types are
    /// printed relative to it.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidIdentifier`] when a member, function or
    /// path segment cannot be written as an identifier.
    pub fn render(&self, scope: &[String], source: &TokenStream) -> Result<TokenStream, ViewError> {
        match self {
            Self::Direct(direct) => direct.render(source),
            Self::StaticFunction(function) => function.render(scope, source),
        }
    }
}
