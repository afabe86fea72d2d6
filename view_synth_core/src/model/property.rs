//! The resolved description of one member of a generated view.

use std::sync::{Arc, Weak};

use crate::access::Access;
use crate::extract::{Converter, DirectExtractor, Extractor, StaticFunctionExtractor};
use crate::model::{Member, MemberKind};
use crate::names::QualifiedName;
use crate::types::TypeRef;

/// One property of a generated view.
///
/// Properties are immutable: every `with_*` method returns a new value and
/// leaves the receiver untouched, so one base property can feed several
/// views resolved from overlapping requests.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use view_synth_core::{Access, Member, Property, TypeRef};
///
/// let member = Arc::new(Member::field("name", TypeRef::parse("String").expect("type")));
/// let base = Property::from_member(&member, Access::Public, Access::None);
/// let hidden = base.with_getter_access(Access::None);
/// assert!(base.has_getter());
/// assert!(!hidden.has_getter());
/// ```
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    declared_modifier: Access,
    getter: Access,
    setter: Access,
    declared_type: TypeRef,
    view_type: Option<QualifiedName>,
    method_backed: bool,
    writable: bool,
    extractor: Option<Extractor>,
    direct: Option<DirectExtractor>,
    converter: Option<Converter>,
    source_element: Weak<Member>,
    comment: Option<String>,
}

impl Property {
    /// Builds the default property for a declared member.
    ///
    /// A setter is only kept when the member is writable.
    #[must_use]
    pub fn from_member(member: &Arc<Member>, getter: Access, setter: Access) -> Self {
        Self {
            name: member.name.clone(),
            declared_modifier: member.modifier,
            getter,
            setter: if member.writable { setter } else { Access::None },
            declared_type: member.declared_type.clone(),
            view_type: None,
            method_backed: member.kind == MemberKind::Method,
            writable: member.writable,
            extractor: None,
            direct: Some(DirectExtractor::for_member(member)),
            converter: None,
            source_element: Arc::downgrade(member),
            comment: member.comment.clone(),
        }
    }

    /// Builds a read-only property computed by a function.
    #[must_use]
    pub fn computed(
        name: impl Into<String>,
        extractor: StaticFunctionExtractor,
        getter: Access,
    ) -> Self {
        let comment = extractor.function().comment.clone();
        let extractor = Extractor::StaticFunction(extractor);
        Self {
            name: name.into(),
            declared_modifier: Access::Public,
            getter,
            setter: Access::None,
            declared_type: extractor.return_type().clone(),
            view_type: None,
            method_backed: true,
            writable: false,
            extractor: Some(extractor),
            direct: None,
            converter: None,
            source_element: Weak::new(),
            comment,
        }
    }

    /// Returns a copy with a different name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with a different getter visibility.
    #[must_use]
    pub fn with_getter_access(&self, access: Access) -> Self {
        Self {
            getter: access,
            ..self.clone()
        }
    }

    /// Returns a copy with a different setter visibility.
    ///
    /// Read-only properties never gain a setter: the copy keeps
    /// [`Access::None`] when the property is not writable.
    #[must_use]
    pub fn with_setter_access(&self, access: Access) -> Self {
        Self {
            setter: if self.writable { access } else { Access::None },
            ..self.clone()
        }
    }

    /// Returns a copy computed by `extractor`, typed by its return type.
    #[must_use]
    pub fn with_extractor(&self, extractor: Extractor) -> Self {
        Self {
            declared_type: extractor.return_type().clone(),
            method_backed: self.method_backed
                || matches!(extractor, Extractor::StaticFunction(_)),
            extractor: Some(extractor),
            ..self.clone()
        }
    }

    /// Returns a copy exposing `declared_type`, optionally recording that the
    /// value is projected into the generated view `view_type`.
    #[must_use]
    pub fn with_type(&self, declared_type: TypeRef, view_type: Option<QualifiedName>) -> Self {
        Self {
            declared_type,
            view_type,
            ..self.clone()
        }
    }

    /// Returns a copy whose extracted value passes through `converter`.
    ///
    /// The declared type is left alone; callers pair this with
    /// [`Property::with_type`] using [`Converter::output`].
    #[must_use]
    pub fn with_converter(&self, converter: Converter) -> Self {
        Self {
            converter: Some(converter),
            ..self.clone()
        }
    }

    /// Returns a copy with replaced documentation.
    #[must_use]
    pub fn with_comment(&self, comment: Option<String>) -> Self {
        Self {
            comment,
            ..self.clone()
        }
    }

    /// Property name, unique within one view.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Visibility of the source member.
    #[must_use]
    pub const fn declared_modifier(&self) -> Access {
        self.declared_modifier
    }

    /// Getter visibility.
    #[must_use]
    pub const fn getter_access(&self) -> Access {
        self.getter
    }

    /// Setter visibility.
    #[must_use]
    pub const fn setter_access(&self) -> Access {
        self.setter
    }

    /// Returns `true` when a getter is generated.
    #[must_use]
    pub const fn has_getter(&self) -> bool {
        !self.getter.is_none()
    }

    /// Returns `true` when a setter is generated.
    #[must_use]
    pub const fn has_setter(&self) -> bool {
        !self.setter.is_none()
    }

    /// Type exposed by the view.
    #[must_use]
    pub const fn declared_type(&self) -> &TypeRef {
        &self.declared_type
    }

    /// Generated view the value is projected into, if any.
    #[must_use]
    pub const fn view_type(&self) -> Option<&QualifiedName> {
        self.view_type.as_ref()
    }

    /// Returns `true` when the value comes from a call rather than a field.
    #[must_use]
    pub const fn is_method_backed(&self) -> bool {
        self.method_backed
    }

    /// Returns `true` when the source value can be assigned back.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    /// Explicit extractor; `None` means the member is read directly.
    #[must_use]
    pub const fn extractor(&self) -> Option<&Extractor> {
        self.extractor.as_ref()
    }

    /// Conversion applied after extraction.
    #[must_use]
    pub const fn converter(&self) -> Option<&Converter> {
        self.converter.as_ref()
    }

    /// The originating member, while the type model that owns it is alive.
    #[must_use]
    pub fn source_element(&self) -> Option<Arc<Member>> {
        self.source_element.upgrade()
    }

    /// Documentation text.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns `true` when the getter recomputes the value on every call.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.extractor.as_ref().is_some_and(Extractor::is_dynamic)
    }

    /// The extractor that actually produces the value: the explicit one, or
    /// the direct read of the member the property was built from.
    ///
    /// The direct read is captured when the property is created, so it does
    /// not depend on the type model staying alive. Returns `None` only for a
    /// property built with neither.
    #[must_use]
    pub fn effective_extractor(&self) -> Option<Extractor> {
        self.extractor
            .clone()
            .or_else(|| self.direct.clone().map(Extractor::Direct))
    }
}
