//! Rendering of resolved views into Rust items.
//!
//! A [`Renderer`] receives a finished [`ResolvedView`] or [`ResolvedMeta`]
//! and returns the whole token stream for it; nothing is handed to a sink
//! until rendering has succeeded, so a type is never partially emitted.

mod names;
mod rust;

use proc_macro2::TokenStream;

pub use names::MemberNames;
pub use rust::RustRenderer;

use crate::error::ViewError;
use crate::resolve::{ResolvedMeta, ResolvedView};

/// Turns a resolved view into emitted items.
pub trait Renderer {
    /// Renders `view`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Render`] when the view cannot be expressed, for
    /// example because two generated methods would share a name.
    fn render(&self, view: &ResolvedView) -> Result<TokenStream, ViewError>;

    /// Renders the member-name constants of `meta`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Render`] when a constant cannot be named, for
    /// example because two member names map to the same constant.
    fn render_meta(&self, meta: &ResolvedMeta) -> Result<TokenStream, ViewError>;
}
