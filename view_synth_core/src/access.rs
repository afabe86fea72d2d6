//! Visibility levels used for generated types, constructors and accessors.
//!
//! The levels form a total order from [`Access::None`] (suppress the item
//! entirely) up to [`Access::Public`]. Each level other than `None` maps onto
//! a Rust visibility qualifier when rendered.

use std::fmt;
use std::str::FromStr;

use proc_macro2::TokenStream;
use quote::quote;

use crate::error::ViewError;

/// Visibility of a generated item.
///
/// # Examples
///
/// ```
/// use view_synth_core::Access;
///
/// let access: Access = "protected".parse().expect("known access level");
/// assert!(access > Access::Package);
/// assert!(Access::None.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Access {
    /// The item is not generated at all.
    None,
    /// Inherited (module-private) visibility.
    Private,
    /// Visible within the crate: `pub(crate)`.
    Package,
    /// Visible to the parent module: `pub(super)`.
    Protected,
    /// `pub`.
    #[default]
    Public,
}

impl Access {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Private,
        Self::Package,
        Self::Protected,
        Self::Public,
    ];

    /// Returns `true` when the item should not be generated.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Keyword accepted by [`FromStr`] and printed by [`fmt::Display`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Private => "private",
            Self::Package => "package",
            Self::Protected => "protected",
            Self::Public => "public",
        }
    }

    /// Renders the Rust visibility qualifier for this level.
    ///
    /// [`Access::None`] and [`Access::Private`] both render as an empty
    /// stream; callers check [`Access::is_none`] before emitting an item.
    #[must_use]
    pub fn visibility(self) -> TokenStream {
        match self {
            Self::None | Self::Private => TokenStream::new(),
            Self::Package => quote! { pub(crate) },
            Self::Protected => quote! { pub(super) },
            Self::Public => quote! { pub },
        }
    }

    /// Derives the access level of a declared `syn` visibility.
    #[must_use]
    pub fn from_visibility(vis: &syn::Visibility) -> Self {
        match vis {
            syn::Visibility::Public(_) => Self::Public,
            syn::Visibility::Inherited => Self::Private,
            syn::Visibility::Restricted(restricted) => {
                if restricted.path.is_ident("super") {
                    Self::Protected
                } else {
                    Self::Package
                }
            }
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Access {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|access| access.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ViewError::UnknownAccess(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    //! Parsing and rendering of access levels.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("none", Access::None)]
    #[case("Private", Access::Private)]
    #[case("package", Access::Package)]
    #[case("PROTECTED", Access::Protected)]
    #[case("public", Access::Public)]
    fn parses_keywords_case_insensitively(#[case] input: &str, #[case] expected: Access) {
        assert_eq!(input.parse::<Access>().ok(), Some(expected));
    }

    #[rstest]
    fn rejects_unknown_keywords() {
        let err = "friend".parse::<Access>().expect_err("unknown keyword");
        assert!(err.to_string().contains("friend"));
    }

    #[rstest]
    #[case(Access::Private, "")]
    #[case(Access::Package, "pub (crate)")]
    #[case(Access::Protected, "pub (super)")]
    #[case(Access::Public, "pub")]
    fn renders_visibility(#[case] access: Access, #[case] expected: &str) {
        assert_eq!(access.visibility().to_string(), expected);
    }

    #[rstest]
    #[case(syn::parse_quote!(pub), Access::Public)]
    #[case(syn::Visibility::Inherited, Access::Private)]
    #[case(syn::parse_quote!(pub(crate)), Access::Package)]
    #[case(syn::parse_quote!(pub(super)), Access::Protected)]
    fn reads_declared_visibility(#[case] vis: syn::Visibility, #[case] expected: Access) {
        assert_eq!(Access::from_visibility(&vis), expected);
    }

    #[rstest]
    fn levels_are_ordered() {
        let mut shuffled = vec![Access::Public, Access::None, Access::Protected, Access::Private];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Access::None, Access::Private, Access::Protected, Access::Public]
        );
    }
}
