//! Read-only query surface over the types visible in one round.

use std::collections::BTreeMap;

use crate::model::TypeInfo;
use crate::names::QualifiedName;

/// Introspection the engine needs from its host.
///
/// Implementations only report what is declared; they never run user code.
pub trait TypeModel {
    /// Looks up a type by qualified name.
    fn type_info(&self, name: &QualifiedName) -> Option<&TypeInfo>;
}

/// A [`TypeModel`] backed by a map, filled by the source adapter or by hand.
///
/// # Examples
///
/// ```
/// use view_synth_core::{InMemoryTypeModel, Member, QualifiedName, TypeInfo, TypeModel, TypeRef};
///
/// let person = QualifiedName::new(["model"], "Person");
/// let mut model = InMemoryTypeModel::default();
/// model.insert(
///     TypeInfo::new(person.clone())
///         .with_member(Member::field("name", TypeRef::parse("String").expect("type"))),
/// );
/// assert_eq!(model.type_info(&person).map(|info| info.members.len()), Some(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTypeModel {
    types: BTreeMap<QualifiedName, TypeInfo>,
}

impl InMemoryTypeModel {
    /// Registers a type, replacing any previous entry with the same name.
    pub fn insert(&mut self, info: TypeInfo) {
        self.types.insert(info.name.clone(), info);
    }

    /// Mutable access for adapters that discover members after the type.
    pub fn get_mut(&mut self, name: &QualifiedName) -> Option<&mut TypeInfo> {
        self.types.get_mut(name)
    }

    /// Iterates registered types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    /// Consumes the model, yielding its types in name order.
    pub fn into_types(self) -> impl Iterator<Item = TypeInfo> {
        self.types.into_values()
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` when no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeModel for InMemoryTypeModel {
    fn type_info(&self, name: &QualifiedName) -> Option<&TypeInfo> {
        self.types.get(name)
    }
}

impl Extend<TypeInfo> for InMemoryTypeModel {
    fn extend<T: IntoIterator<Item = TypeInfo>>(&mut self, iter: T) {
        for info in iter {
            self.insert(info);
        }
    }
}
