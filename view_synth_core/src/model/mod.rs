//! Data model shared by the resolution engine and the renderer.

mod member;
mod property;

pub use member::{Member, MemberKind, TypeInfo};
pub use property::Property;
