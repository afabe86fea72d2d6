//! Walks items of one module and records types, members and requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use proc_macro2::Span;

use super::attrs::{
    FunctionProperty, VIEW_META, VIEW_OF, VIEW_PROPERTY, is_helper, parse_function_property,
    parse_property_override, parse_view_meta, parse_view_of,
};
use crate::access::Access;
use crate::extract::FunctionSig;
use crate::model::{Member, TypeInfo};
use crate::names::QualifiedName;
use crate::request::{ConfigBearer, NewProperty, PropertyOverride};
use crate::types::{TypeRef, unraw};

/// A `fn set_x(&mut self, value: T)` seen before its member is known.
struct PendingSetter {
    owner: QualifiedName,
    member: String,
    function: String,
    value_type: TypeRef,
}

/// Accumulates everything found while walking one compilation unit.
#[derive(Default)]
pub(super) struct Collector {
    pub(super) types: Vec<TypeInfo>,
    pub(super) bearers: BTreeMap<QualifiedName, ConfigBearer>,
    pub(super) spans: BTreeMap<QualifiedName, Span>,
    accessors: Vec<(QualifiedName, Member)>,
    setters: Vec<PendingSetter>,
    errors: Option<syn::Error>,
}

impl Collector {
    fn push_error(&mut self, err: syn::Error) {
        match &mut self.errors {
            Some(existing) => existing.combine(err),
            None => self.errors = Some(err),
        }
    }

    fn bearer(&mut self, name: &QualifiedName, span: Span) -> &mut ConfigBearer {
        self.spans.entry(name.clone()).or_insert(span);
        self.bearers
            .entry(name.clone())
            .or_insert_with(|| ConfigBearer::new(name.clone()))
    }

    /// Records the structs of `items`; call before [`Collector::impls`].
    pub(super) fn structs(&mut self, scope: &[String], items: &[syn::Item]) {
        for item in items {
            if let syn::Item::Struct(item) = item {
                self.record_struct(scope, item);
            }
        }
    }

    /// Records accessors and property functions of the inherent `impl`
    /// blocks in `items`.
    pub(super) fn impls(&mut self, scope: &[String], items: &[syn::Item]) {
        for item in items {
            if let syn::Item::Impl(block) = item {
                self.record_impl(scope, block);
            }
        }
    }

    fn record_struct(&mut self, scope: &[String], item: &syn::ItemStruct) {
        let name = QualifiedName::new(scope.iter().cloned(), unraw(&item.ident.to_string()));
        let mut info = TypeInfo::new(name.clone());
        info.generic = !item.generics.params.is_empty();
        info.comment = doc_comment(&item.attrs);
        if let syn::Fields::Named(fields) = &item.fields {
            for field in &fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let mut member = Member::field(unraw(&ident.to_string()), TypeRef::new(field.ty.clone()))
                    .with_modifier(Access::from_visibility(&field.vis));
                member.comment = doc_comment(&field.attrs);
                info.members.push(Arc::new(member));
            }
        }
        self.types.push(info);

        for attr in &item.attrs {
            if is_helper(attr, VIEW_OF) {
                match parse_view_of(attr, scope) {
                    Ok(request) => {
                        self.bearer(&name, item.ident.span()).requests.push(request);
                    }
                    Err(err) => self.push_error(err),
                }
            } else if is_helper(attr, VIEW_PROPERTY) {
                match parse_property_override(attr, scope) {
                    Ok(property) => self.add_override(&name, item.ident.span(), property),
                    Err(err) => self.push_error(err),
                }
            } else if is_helper(attr, VIEW_META) {
                match parse_view_meta(attr, scope) {
                    Ok(meta) => self.bearer(&name, item.ident.span()).metas.push(meta),
                    Err(err) => self.push_error(err),
                }
            }
        }
    }

    fn add_override(&mut self, owner: &QualifiedName, span: Span, property: PropertyOverride) {
        let bearer = self.bearer(owner, span);
        match bearer.overrides.iter_mut().find(|o| o.name == property.name) {
            Some(existing) => merge_override(existing, property),
            None => bearer.overrides.push(property),
        }
    }

    fn record_impl(&mut self, scope: &[String], block: &syn::ItemImpl) {
        if block.trait_.is_some() || !block.generics.params.is_empty() {
            return;
        }
        let syn::Type::Path(self_ty) = block.self_ty.as_ref() else {
            return;
        };
        if self_ty.qself.is_some() {
            return;
        }
        let Some(owner) = QualifiedName::resolve_path(scope, &self_ty.path) else {
            return;
        };
        for item in &block.items {
            let syn::ImplItem::Fn(function) = item else {
                continue;
            };
            match function.attrs.iter().find(|attr| is_helper(attr, VIEW_PROPERTY)) {
                Some(attr) => self.record_property_fn(&owner, function, attr),
                None => self.record_accessor(&owner, function),
            }
        }
    }

    fn record_property_fn(
        &mut self,
        owner: &QualifiedName,
        function: &syn::ImplItemFn,
        attr: &syn::Attribute,
    ) {
        let parsed = match parse_function_property(attr) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.push_error(err);
                return;
            }
        };
        let signature = function_sig(owner, function);
        let span = function.sig.ident.span();
        match parsed {
            FunctionProperty::New {
                name,
                getter,
                setter,
            } => {
                self.bearer(owner, span).new_properties.push(NewProperty {
                    name,
                    function: signature,
                    getter,
                    setter,
                });
            }
            FunctionProperty::Extract { member } => {
                let property = PropertyOverride {
                    extractor: Some(signature),
                    ..PropertyOverride::named(member)
                };
                self.add_override(owner, span, property);
            }
        }
    }

    fn record_accessor(&mut self, owner: &QualifiedName, function: &syn::ImplItemFn) {
        let sig = &function.sig;
        if !sig.generics.params.is_empty() || sig.asyncness.is_some() || sig.unsafety.is_some() {
            return;
        }
        let Some(receiver) = sig.receiver() else {
            return;
        };
        if receiver.reference.is_none() || receiver.colon_token.is_some() {
            return;
        }
        let name = unraw(&sig.ident.to_string()).to_owned();
        let typed: Vec<&syn::Type> = sig
            .inputs
            .iter()
            .filter_map(|input| match input {
                syn::FnArg::Typed(pat) => Some(pat.ty.as_ref()),
                syn::FnArg::Receiver(_) => None,
            })
            .collect();
        match (receiver.mutability.is_some(), typed.as_slice(), &sig.output) {
            (false, [], syn::ReturnType::Type(_, ty)) => {
                let declared_type = TypeRef::new(ty.as_ref().clone());
                if !declared_type.is_storable() {
                    return;
                }
                let mut member = Member::method(name, declared_type)
                    .with_modifier(Access::from_visibility(&function.vis));
                member.comment = doc_comment(&function.attrs);
                self.accessors.push((owner.clone(), member));
            }
            (true, [value_type], syn::ReturnType::Default) => {
                if let Some(member) = name.strip_prefix("set_") {
                    self.setters.push(PendingSetter {
                        owner: owner.clone(),
                        member: member.to_owned(),
                        function: name.clone(),
                        value_type: TypeRef::new((*value_type).clone()),
                    });
                }
            }
            _ => {}
        }
    }

    /// Attaches accessors and setters to their types and returns any
    /// attribute errors.
    pub(super) fn finish(&mut self) -> Option<syn::Error> {
        for (owner, member) in std::mem::take(&mut self.accessors) {
            let Some(info) = self.types.iter_mut().find(|info| info.name == owner) else {
                continue;
            };
            if info.member(&member.name).is_none() {
                info.members.push(Arc::new(member));
            }
        }
        for setter in std::mem::take(&mut self.setters) {
            let Some(member) = self
                .types
                .iter_mut()
                .filter(|info| info.name == setter.owner)
                .flat_map(|info| info.members.iter_mut())
                .find(|member| member.name == setter.member && member.declared_type == setter.value_type)
            else {
                continue;
            };
            let member = Arc::make_mut(member);
            member.setter_name = Some(setter.function);
            member.writable = true;
        }
        self.errors.take()
    }
}

fn merge_override(existing: &mut PropertyOverride, other: PropertyOverride) {
    existing.rename = other.rename.or(existing.rename.take());
    existing.getter = other.getter.or(existing.getter);
    existing.setter = other.setter.or(existing.setter);
    existing.converter = other.converter.or(existing.converter.take());
    existing.view = other.view.or(existing.view.take());
    existing.extractor = other.extractor.or(existing.extractor.take());
    existing.comment = other.comment.or(existing.comment.take());
}

fn function_sig(owner: &QualifiedName, function: &syn::ImplItemFn) -> FunctionSig {
    let sig = &function.sig;
    let params = sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            syn::FnArg::Typed(pat) => Some(TypeRef::new(pat.ty.as_ref().clone())),
            syn::FnArg::Receiver(_) => None,
        })
        .collect();
    let return_type = match &sig.output {
        syn::ReturnType::Default => TypeRef::new(syn::parse_quote!(())),
        syn::ReturnType::Type(_, ty) => TypeRef::new(ty.as_ref().clone()),
    };
    FunctionSig {
        container: owner.clone(),
        name: unraw(&sig.ident.to_string()).to_owned(),
        has_receiver: sig.receiver().is_some(),
        params,
        return_type,
        comment: doc_comment(&function.attrs),
    }
}

/// Joins `#[doc = "..."]` lines, dropping the single leading space rustdoc
/// inserts after `///`.
pub(super) fn doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value()),
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_owned).unwrap_or(line))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
