//! Compile-time generation of view types.
//!
//! A view is a reduced projection of a model type: a chosen subset of its
//! members, exposed through configurable accessors and constructors, with
//! optional custom extraction and conversion. Views are requested with
//! attributes and generated either by the [`macro@views`] attribute macro or
//! by the build-script generator in `view_synth_core`.
//!
//! ```
//! #[view_synth::views]
//! mod model {
//!     #[view_of(includes("name", "age"))]
//!     pub struct Person {
//!         pub name: String,
//!         pub age: u32,
//!         pub password: String,
//!     }
//! }
//!
//! let person = model::Person {
//!     name: String::from("Ada"),
//!     age: 36,
//!     password: String::from("hunter2"),
//! };
//! let view = model::PersonView::from_source(&person);
//! assert_eq!(view.name(), "Ada");
//! assert_eq!(*view.age(), 36);
//! ```
//!
//! `#[view_meta]` generates a companion type naming every member of its
//! target, e.g. `PersonMeta::NAME == "name"`.
//!
//! Generated code calls into this crate through [`PropertyConverter`].

pub mod converters;

pub use view_synth_macros::{view_meta, view_of, view_property, views};

/// Adapts an extracted property value before it is stored in a view.
///
/// Converters are named in `#[view_property(converter = ...)]` and are
/// applied after extraction. The view field takes the converter's
/// [`Output`](PropertyConverter::Output) type unless `converter_output`
/// names one explicitly.
///
/// # Examples
///
/// ```
/// use view_synth::PropertyConverter;
///
/// struct Shout;
///
/// impl PropertyConverter<String> for Shout {
///     type Output = String;
///
///     fn convert(value: String) -> String {
///         value.to_uppercase()
///     }
/// }
///
/// assert_eq!(Shout::convert(String::from("hi")), "HI");
/// ```
pub trait PropertyConverter<Input> {
    /// Type of the converted value.
    type Output;

    /// Converts one extracted value.
    fn convert(value: Input) -> Self::Output;
}
