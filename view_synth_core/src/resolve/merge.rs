//! Gathers the members a view starts from.

use crate::error::ViewError;
use crate::filter::MemberFilter;
use crate::model::{Property, TypeInfo};
use crate::names::QualifiedName;
use crate::request::{ConfigBearer, ViewRequest};

/// Requests of the round viewing `target` through `config`.
///
/// The requests are returned in bearer then declaration order.
pub(super) fn contributing<'a>(
    bearers: &'a [ConfigBearer],
    target: &'a QualifiedName,
    config: &'a QualifiedName,
) -> impl Iterator<Item = &'a ViewRequest> + 'a {
    bearers.iter().flat_map(move |bearer| {
        bearer.requests.iter().filter(move |request| {
            &request.resolved_target(&bearer.name) == target
                && &request.resolved_config(&bearer.name) == config
        })
    })
}

/// Default properties for the members of `info` accepted by the combined
/// filter of every contributing request, in declaration order.
///
/// # Errors
///
/// Returns [`ViewError::InvalidPattern`] when a contributing pattern does not
/// compile.
pub(super) fn base_properties<'a, I>(
    info: &TypeInfo,
    contributing: I,
    winner: &ViewRequest,
) -> Result<Vec<Property>, ViewError>
where
    I: IntoIterator<Item = &'a ViewRequest>,
{
    let filter = MemberFilter::from_requests(contributing)?;
    let properties = info
        .members
        .iter()
        .filter(|member| filter.accepts(&member.name))
        .map(|member| Property::from_member(member, winner.getters, winner.setters))
        .collect();
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::access::Access;
    use crate::model::Member;
    use crate::types::TypeRef;

    fn name(path: &str) -> QualifiedName {
        QualifiedName::parse(path).expect("valid name")
    }

    #[fixture]
    fn person() -> TypeInfo {
        let string = TypeRef::parse("String").expect("type");
        TypeInfo::new(name("m::Person"))
            .with_member(Member::field("name", string.clone()))
            .with_member(Member::field("email", string))
            .with_member(Member::method("age", TypeRef::parse("u32").expect("type")))
    }

    fn names(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(Property::name).collect()
    }

    #[rstest]
    fn merges_includes_of_every_request_sharing_the_config(person: TypeInfo) -> Result<()> {
        let target = name("m::Person");
        let bearers = vec![
            ConfigBearer::new(name("m::A"))
                .with_request(ViewRequest::of(target.clone()).including(["name"])),
            ConfigBearer::new(name("m::B"))
                .with_request(ViewRequest::of(target.clone()).including(["age"])),
        ];
        let config = name("m::A");
        let requests: Vec<_> = contributing(&bearers, &target, &config).collect();
        ensure!(requests.len() == 1, "config B differs from A");

        let shared = vec![
            ConfigBearer::new(name("m::A")).with_request(ViewRequest {
                config: name("m::Shared").into(),
                ..ViewRequest::of(target.clone()).including(["name"])
            }),
            ConfigBearer::new(name("m::B")).with_request(ViewRequest {
                config: name("m::Shared").into(),
                ..ViewRequest::of(target.clone()).including(["age"])
            }),
        ];
        let config = name("m::Shared");
        let winner = &shared[0].requests[0];
        let properties =
            base_properties(&person, contributing(&shared, &target, &config), winner)?;
        ensure!(names(&properties) == ["name", "age"], "got {:?}", names(&properties));
        Ok(())
    }

    #[rstest]
    fn exclusion_wins_and_order_follows_declaration(person: TypeInfo) -> Result<()> {
        let request = ViewRequest {
            include_pattern: Some(String::from(".*")),
            ..ViewRequest::of(name("m::Person")).excluding(["email"])
        };
        let properties = base_properties(&person, [&request], &request)?;
        ensure!(names(&properties) == ["name", "age"]);
        Ok(())
    }

    #[rstest]
    fn accessors_default_to_the_winning_request(person: TypeInfo) -> Result<()> {
        let request = ViewRequest {
            getters: Access::Package,
            setters: Access::Public,
            include_pattern: Some(String::from(".*")),
            ..ViewRequest::of(name("m::Person"))
        };
        let properties = base_properties(&person, [&request], &request)?;
        ensure!(properties.iter().all(|p| p.getter_access() == Access::Package));
        let age = properties
            .iter()
            .find(|p| p.name() == "age")
            .ok_or_else(|| anyhow::anyhow!("age missing"))?;
        ensure!(!age.has_setter(), "read-only members never gain a setter");
        ensure!(properties[0].setter_access() == Access::Public);
        Ok(())
    }
}
