//! Renders a view as a Rust struct with an inherent `impl` block.

use std::collections::HashSet;

use heck::ToShoutySnakeCase;
use proc_macro2::{Span, TokenStream};
use quote::quote;

use super::Renderer;
use super::names::{MemberNames, duplicate_method};
use crate::access::Access;
use crate::config::EngineConfig;
use crate::error::ViewError;
use crate::model::Property;
use crate::names::QualifiedName;
use crate::resolve::{ResolvedMeta, ResolvedView};
use crate::types::ident;

/// The renderer used by both the attribute macro and the build-script
/// generator.
///
/// # Examples
///
/// ```
/// use view_synth_core::{EngineConfig, RustRenderer};
///
/// let renderer = RustRenderer::from_config(&EngineConfig::default()).expect("valid config");
/// # let _ = renderer;
/// ```
#[derive(Debug, Clone)]
pub struct RustRenderer {
    runtime: syn::Path,
    derives: Vec<syn::Path>,
}

impl RustRenderer {
    /// Builds a renderer with the runtime path and derives from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidName`] when a configured path is invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ViewError> {
        Ok(Self {
            runtime: config.runtime_path()?,
            derives: config.derive_paths()?,
        })
    }

    /// Path of the runtime crate generated code refers to.
    #[must_use]
    pub const fn runtime(&self) -> &syn::Path {
        &self.runtime
    }
}

struct Slot<'a> {
    property: &'a Property,
    names: MemberNames,
}

impl Renderer for RustRenderer {
    fn render(&self, view: &ResolvedView) -> Result<TokenStream, ViewError> {
        let failed = |err: ViewError| render_error(&view.name, &err);
        let slots = view
            .properties
            .iter()
            .map(|property| {
                Ok(Slot {
                    property,
                    names: MemberNames::for_property(property)?,
                })
            })
            .collect::<Result<Vec<Slot<'_>>, ViewError>>()
            .map_err(failed)?;
        if let Some(method) =
            duplicate_method(slots.iter().map(|slot| (slot.property, &slot.names)))
        {
            return Err(ViewError::Render {
                view: view.name.clone(),
                message: format!("method `{method}` would be generated twice"),
            });
        }

        let scope = view.name.module();
        let view_ident = ident(view.name.simple_name(), Span::call_site()).map_err(failed)?;
        let target = view.target.path_from(scope).map_err(failed)?;
        let type_vis = view.request.type_access.visibility();
        let derives = &self.derives;
        let derive_attr = if derives.is_empty() {
            TokenStream::new()
        } else {
            quote! { #[derive(#(#derives),*)] }
        };
        let type_doc = doc_attrs(Some(&format!("View of `{}`.", view.target)));

        let fields = slots.iter().map(|slot| {
            let field = &slot.names.field;
            let ty = slot.property.declared_type();
            quote! { #field: #ty }
        });

        let mut methods = Vec::new();
        methods.extend(empty_ctor(view, &slots));
        methods.extend(fields_ctor(view, &slots));
        methods.extend(copy_ctor(view, &slots, &target)?);
        for slot in &slots {
            methods.extend(render_getter(slot, scope).map_err(failed)?);
            methods.extend(render_setter(slot));
        }
        methods.extend(render_errors(view));

        let from_impl = if view.request.copy_ctor == Access::Public {
            quote! {
                impl ::core::convert::From<&#target> for #view_ident {
                    fn from(source: &#target) -> Self {
                        Self::from_source(source)
                    }
                }
            }
        } else {
            TokenStream::new()
        };
        // An outer view's `empty()` fills nested view fields through `Default`.
        let default_impl = if view.request.empty_ctor == Access::Public {
            quote! {
                impl ::core::default::Default for #view_ident {
                    fn default() -> Self {
                        Self::empty()
                    }
                }
            }
        } else {
            TokenStream::new()
        };

        Ok(quote! {
            #type_doc
            #derive_attr
            #type_vis struct #view_ident {
                #(#fields,)*
            }

            #[allow(dead_code, reason = "generated accessors may go unused")]
            impl #view_ident {
                #(#methods)*
            }

            #from_impl
            #default_impl
        })
    }

    fn render_meta(&self, meta: &ResolvedMeta) -> Result<TokenStream, ViewError> {
        let failed = |err: ViewError| render_error(&meta.name, &err);
        let meta_ident = ident(meta.name.simple_name(), Span::call_site()).map_err(failed)?;
        let vis = meta.type_access.visibility();
        let type_doc = doc_attrs(Some(&format!("Member names of `{}`.", meta.target)));

        let mut seen = HashSet::new();
        let constants = meta
            .members
            .iter()
            .map(|member| {
                let constant = member.to_shouty_snake_case();
                if !seen.insert(constant.clone()) {
                    return Err(ViewError::Render {
                        view: meta.name.clone(),
                        message: format!("constant `{constant}` would be generated twice"),
                    });
                }
                let name = ident(&constant, Span::call_site()).map_err(failed)?;
                let doc = format!(" Name of the member `{member}`.");
                Ok(quote! {
                    #[doc = #doc]
                    pub const #name: &'static str = #member;
                })
            })
            .collect::<Result<Vec<_>, ViewError>>()?;

        Ok(quote! {
            #type_doc
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            #vis struct #meta_ident;

            #[allow(dead_code, reason = "generated constants may go unused")]
            impl #meta_ident {
                #(#constants)*
            }
        })
    }
}

fn empty_ctor(view: &ResolvedView, slots: &[Slot<'_>]) -> Option<TokenStream> {
    let access = view.request.empty_ctor;
    if access.is_none() {
        return None;
    }
    let vis = access.visibility();
    let fields = slots.iter().map(|slot| &slot.names.field);
    Some(quote! {
        /// Creates a view with every property set to its default value.
        #vis fn empty() -> Self {
            Self {
                #(#fields: ::core::default::Default::default(),)*
            }
        }
    })
}

fn fields_ctor(view: &ResolvedView, slots: &[Slot<'_>]) -> Option<TokenStream> {
    let access = view.request.fields_ctor;
    if access.is_none() {
        return None;
    }
    let vis = access.visibility();
    let params = slots.iter().map(|slot| {
        let field = &slot.names.field;
        let ty = slot.property.declared_type();
        quote! { #field: #ty }
    });
    let fields = slots.iter().map(|slot| &slot.names.field);
    Some(quote! {
        /// Creates a view from its property values.
        #[allow(
            clippy::too_many_arguments,
            reason = "the constructor takes one argument per property"
        )]
        #vis fn new(#(#params),*) -> Self {
            Self {
                #(#fields,)*
            }
        }
    })
}

fn copy_ctor(
    view: &ResolvedView,
    slots: &[Slot<'_>],
    target: &syn::Path,
) -> Result<Option<TokenStream>, ViewError> {
    let access = view.request.copy_ctor;
    if access.is_none() {
        return Ok(None);
    }
    let vis = access.visibility();
    let scope = view.name.module();
    let source = quote! { source };
    let inits = slots
        .iter()
        .map(|slot| {
            let field = &slot.names.field;
            let value = value_expr(view, slot.property, scope, &source)?;
            Ok(quote! { #field: #value })
        })
        .collect::<Result<Vec<_>, ViewError>>()?;
    Ok(Some(quote! {
        /// Creates a view by extracting every property from `source`.
        #vis fn from_source(source: &#target) -> Self {
            Self {
                #(#inits,)*
            }
        }
    }))
}

/// Extraction, then conversion, then projection into a nested view.
fn value_expr(
    view: &ResolvedView,
    property: &Property,
    scope: &[String],
    source: &TokenStream,
) -> Result<TokenStream, ViewError> {
    let extractor = property.effective_extractor().ok_or_else(|| ViewError::Render {
        view: view.name.clone(),
        message: format!("the property \"{}\" has no way to read its value", property.name()),
    })?;
    let extracted = extractor
        .render(scope, source)
        .map_err(|err| render_error(&view.name, &err))?;
    let converted = match property.converter() {
        Some(converter) => converter.render(&extracted),
        None => extracted,
    };
    Ok(match property.view_type() {
        Some(nested) => {
            let path = nested
                .path_from(scope)
                .map_err(|err| render_error(&view.name, &err))?;
            quote! { #path::from_source(&#converted) }
        }
        None => converted,
    })
}

fn render_error(view: &QualifiedName, err: &ViewError) -> ViewError {
    ViewError::Render {
        view: view.clone(),
        message: err.to_string(),
    }
}

fn render_getter(slot: &Slot<'_>, scope: &[String]) -> Result<Option<TokenStream>, ViewError> {
    let property = slot.property;
    if !property.has_getter() {
        return Ok(None);
    }
    let vis = property.getter_access().visibility();
    let docs = doc_attrs(property.comment());
    let getter = &slot.names.getter;
    let field = &slot.names.field;
    let ty = property.declared_type();
    let body = match property.extractor() {
        Some(extractor) if property.is_dynamic() => {
            let value = extractor.render(scope, &TokenStream::new())?;
            quote! {
                #vis fn #getter(&self) -> #ty {
                    #value
                }
            }
        }
        _ => quote! {
            #vis fn #getter(&self) -> &#ty {
                &self.#field
            }
        },
    };
    Ok(Some(quote! {
        #docs
        #body
    }))
}

fn render_setter(slot: &Slot<'_>) -> Option<TokenStream> {
    let property = slot.property;
    if !property.has_setter() {
        return None;
    }
    let vis = property.setter_access().visibility();
    let MemberNames { field, setter, .. } = &slot.names;
    let ty = property.declared_type();
    Some(quote! {
        #vis fn #setter(&mut self, #field: #ty) {
            self.#field = #field;
        }
    })
}

fn render_errors(view: &ResolvedView) -> Option<TokenStream> {
    if !view.request.error_methods {
        return None;
    }
    let errors = &view.errors;
    Some(quote! {
        /// Problems reported while this view was generated.
        #[doc(hidden)]
        pub fn view_errors() -> &'static [&'static str] {
            &[#(#errors),*]
        }
    })
}

fn doc_attrs(comment: Option<&str>) -> TokenStream {
    let Some(comment) = comment else {
        return TokenStream::new();
    };
    let lines = comment.lines().map(|line| {
        let text = if line.is_empty() {
            String::new()
        } else {
            format!(" {line}")
        };
        quote! { #[doc = #text] }
    });
    quote! { #(#lines)* }
}
