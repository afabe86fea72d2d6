//! Front-end turning Rust items into a type model and view requests.
//!
//! Structs contribute their named fields as members; inherent `impl` blocks
//! contribute accessor methods `fn x(&self) -> T` and mark members writable
//! through `fn set_x(&mut self, value: T)`. Requests and customisations are
//! read from the `#[view_of]`, `#[view_property]` and `#[view_meta]` helper
//! attributes.

mod attrs;
mod collect;
mod literals;

use std::collections::BTreeMap;

use proc_macro2::Span;
use syn::visit::Visit;

pub use attrs::{VIEW_META, VIEW_OF, VIEW_PROPERTY};

use crate::names::QualifiedName;
use crate::request::ConfigBearer;
use crate::type_model::InMemoryTypeModel;
use collect::Collector;

/// Types and requests of one compilation unit.
#[derive(Debug, Default)]
pub struct SourceUnit {
    /// Declared types with their members.
    pub model: InMemoryTypeModel,
    /// Configuration-bearing types, ordered by name.
    pub bearers: Vec<ConfigBearer>,
    spans: BTreeMap<QualifiedName, Span>,
}

impl SourceUnit {
    /// Reads the top-level `items` of the module `scope`.
    ///
    /// Nested modules are not entered.
    ///
    /// # Errors
    ///
    /// Returns every malformed helper attribute, combined into one error.
    pub fn from_items(scope: &[String], items: &[syn::Item]) -> syn::Result<Self> {
        let mut collector = Collector::default();
        collector.structs(scope, items);
        collector.impls(scope, items);
        Self::finish(collector)
    }

    /// Reads a whole file whose items live in `scope`, entering inline
    /// modules.
    ///
    /// # Errors
    ///
    /// Returns every malformed helper attribute, combined into one error.
    pub fn from_file(scope: &[String], file: &syn::File) -> syn::Result<Self> {
        let mut walker = ModuleWalker {
            scope: scope.to_vec(),
            collector: Collector::default(),
            pass: Pass::Structs,
        };
        walker.visit_file(file);
        walker.pass = Pass::Impls;
        walker.visit_file(file);
        Self::finish(walker.collector)
    }

    fn finish(mut collector: Collector) -> syn::Result<Self> {
        if let Some(err) = collector.finish() {
            return Err(err);
        }
        let mut model = InMemoryTypeModel::default();
        model.extend(collector.types);
        Ok(Self {
            model,
            bearers: collector.bearers.into_values().collect(),
            spans: collector.spans,
        })
    }

    /// Merges another unit into this one; later types replace earlier ones
    /// with the same name.
    pub fn merge(&mut self, other: Self) {
        self.model.extend(other.model.into_types());
        self.bearers.extend(other.bearers);
        self.bearers.sort_by(|a, b| a.name.cmp(&b.name));
        self.spans.extend(other.spans);
    }

    /// Span of the item declaring the bearer `name`.
    #[must_use]
    pub fn span_of(&self, name: &QualifiedName) -> Span {
        self.spans.get(name).copied().unwrap_or_else(Span::call_site)
    }
}

/// Removes helper attributes from the top-level `items` so the compiler
/// never sees them.
pub fn strip_helper_attrs(items: &mut [syn::Item]) {
    for item in items {
        match item {
            syn::Item::Struct(item) => attrs::strip_helpers(&mut item.attrs),
            syn::Item::Impl(block) => {
                for member in &mut block.items {
                    if let syn::ImplItem::Fn(function) = member {
                        attrs::strip_helpers(&mut function.attrs);
                    }
                }
            }
            _ => {}
        }
    }
}

#[derive(Clone, Copy)]
enum Pass {
    Structs,
    Impls,
}

struct ModuleWalker {
    scope: Vec<String>,
    collector: Collector,
    pass: Pass,
}

impl<'ast> Visit<'ast> for ModuleWalker {
    fn visit_file(&mut self, file: &'ast syn::File) {
        self.visit_items(&file.items);
    }

    fn visit_item_mod(&mut self, module: &'ast syn::ItemMod) {
        let Some((_, items)) = &module.content else {
            return;
        };
        self.scope.push(crate::types::unraw(&module.ident.to_string()).to_owned());
        self.visit_items(items);
        self.scope.pop();
    }
}

impl ModuleWalker {
    fn visit_items(&mut self, items: &[syn::Item]) {
        match self.pass {
            Pass::Structs => self.collector.structs(&self.scope, items),
            Pass::Impls => self.collector.impls(&self.scope, items),
        }
        for item in items {
            if let syn::Item::Mod(module) = item {
                self.visit_item_mod(module);
            }
        }
    }
}
