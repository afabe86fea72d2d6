//! Procedural macros for `view_synth`.
//!
//! [`macro@views`] runs the resolution engine over the items of an inline
//! module and appends the generated view types to it. [`macro@view_of`],
//! [`macro@view_property`] and [`macro@view_meta`] are the helper attributes
//! it reads; on their own they expand to the annotated item unchanged, so
//! sources processed by the build-script generator still compile.

use proc_macro::TokenStream;

mod expand;

/// Generates the views requested inside an inline module.
///
/// Options: `suffix = "Dto"` replaces the default `View` suffix and
/// `runtime = path` names the runtime crate when it is re-exported under
/// another path. Settings from `view_synth.toml` in the package root apply
/// first.
#[proc_macro_attribute]
pub fn views(args: TokenStream, item: TokenStream) -> TokenStream {
    expand::views(args.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Requests a view of a type. Read by [`macro@views`] and the build-script
/// generator.
#[proc_macro_attribute]
pub fn view_of(_args: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Customises one property of a view, or adds a function-backed one.
/// Read by [`macro@views`] and the build-script generator.
#[proc_macro_attribute]
pub fn view_property(_args: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Requests a meta type holding the name of every member of a type as a
/// string constant. Read by [`macro@views`] and the build-script generator.
#[proc_macro_attribute]
pub fn view_meta(_args: TokenStream, item: TokenStream) -> TokenStream {
    item
}
