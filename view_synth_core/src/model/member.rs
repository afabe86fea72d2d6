//! Declared members of a source type as reported by a [`crate::TypeModel`].

use std::sync::Arc;

use crate::access::Access;
use crate::names::QualifiedName;
use crate::types::TypeRef;

/// How a member's value is read from a source instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A named field, read as `source.name`.
    Field,
    /// An accessor method `fn name(&self) -> T`, read as `source.name()`.
    Method,
}

/// One declared member of a source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name; property names default to it.
    pub name: String,
    /// Declared value type.
    pub declared_type: TypeRef,
    /// The member's own visibility.
    pub modifier: Access,
    /// Field or accessor method.
    pub kind: MemberKind,
    /// Name of the source accessor used to read a method member.
    pub getter_name: Option<String>,
    /// Name of a source mutator `fn set_x(&mut self, value: T)`, when present.
    pub setter_name: Option<String>,
    /// Whether the source value can be assigned back.
    pub writable: bool,
    /// Documentation text, one entry per doc line joined by newlines.
    pub comment: Option<String>,
}

impl Member {
    /// A writable field member.
    #[must_use]
    pub fn field(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            modifier: Access::Public,
            kind: MemberKind::Field,
            getter_name: None,
            setter_name: None,
            writable: true,
            comment: None,
        }
    }

    /// A read-only accessor method member.
    #[must_use]
    pub fn method(name: impl Into<String>, declared_type: TypeRef) -> Self {
        let name = name.into();
        Self {
            getter_name: Some(name.clone()),
            name,
            declared_type,
            modifier: Access::Public,
            kind: MemberKind::Method,
            setter_name: None,
            writable: false,
            comment: None,
        }
    }

    /// Replaces the documentation text.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Replaces the declared visibility.
    #[must_use]
    pub const fn with_modifier(mut self, modifier: Access) -> Self {
        self.modifier = modifier;
        self
    }

    /// Records a source mutator, making the member writable.
    #[must_use]
    pub fn with_setter(mut self, setter_name: impl Into<String>) -> Self {
        self.setter_name = Some(setter_name.into());
        self.writable = true;
        self
    }

    /// Returns `true` for accessor-method members.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }
}

/// Everything the engine needs to know about one source type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Fully qualified name.
    pub name: QualifiedName,
    /// Members in declaration order.
    pub members: Vec<Arc<Member>>,
    /// Whether the type declares generic parameters.
    pub generic: bool,
    /// Documentation text.
    pub comment: Option<String>,
}

impl TypeInfo {
    /// A non-generic type without members.
    #[must_use]
    pub const fn new(name: QualifiedName) -> Self {
        Self {
            name,
            members: Vec::new(),
            generic: false,
            comment: None,
        }
    }

    /// Appends a member.
    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(Arc::new(member));
        self
    }

    /// Looks a member up by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Arc<Member>> {
        self.members.iter().find(|member| member.name == name)
    }
}
