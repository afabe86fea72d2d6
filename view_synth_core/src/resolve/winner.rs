//! Picks the one bearer allowed to generate views, or the meta type, of a
//! target.

use crate::names::QualifiedName;
use crate::request::ConfigBearer;

/// Every bearer with at least one request viewing `target`.
pub(super) fn competitors<'a>(
    bearers: &'a [ConfigBearer],
    target: &'a QualifiedName,
) -> impl Iterator<Item = &'a ConfigBearer> + 'a {
    bearers.iter().filter(move |bearer| bearer.targets(target))
}

/// The competitor with the lexicographically smallest qualified name.
///
/// Qualified names are unique within a round, so there is never a tie.
// TODO: let a request declare an explicit priority; the name ordering is
// arbitrary and silently favours whichever module sorts first.
pub(super) fn select<'a>(
    bearers: &'a [ConfigBearer],
    target: &'a QualifiedName,
) -> Option<&'a QualifiedName> {
    smallest(competitors(bearers, target))
}

/// The bearer generating the meta type of `target`, chosen like [`select`]
/// among the bearers with a meta request for it.
pub(super) fn select_meta<'a>(
    bearers: &'a [ConfigBearer],
    target: &'a QualifiedName,
) -> Option<&'a QualifiedName> {
    smallest(bearers.iter().filter(|bearer| bearer.describes(target)))
}

fn smallest<'a>(candidates: impl Iterator<Item = &'a ConfigBearer>) -> Option<&'a QualifiedName> {
    candidates.map(|bearer| &bearer.name).min()
}

/// Warning recorded when `bearer` defers to `winner`.
pub(super) fn deferral_message(
    generated: &QualifiedName,
    bearer: &QualifiedName,
    winner: &QualifiedName,
    target: &QualifiedName,
) -> String {
    format!(
        "The view \"{generated}\" configured on \"{bearer}\" will not be generated, because \
         \"{winner}\" has configured a view of \"{target}\" and has a higher priority."
    )
}

/// Warning recorded when the meta request of `bearer` defers to `winner`.
pub(super) fn meta_deferral_message(
    generated: &QualifiedName,
    bearer: &QualifiedName,
    winner: &QualifiedName,
) -> String {
    format!(
        "The meta type \"{generated}\" configured on \"{bearer}\" will not be generated, \
         because \"{winner}\" has configured a similar meta type and has a higher priority."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{MetaRequest, ViewRequest};
    use rstest::rstest;

    fn name(path: &str) -> QualifiedName {
        QualifiedName::parse(path).expect("valid name")
    }

    fn bearer(path: &str, target: &str) -> ConfigBearer {
        ConfigBearer::new(name(path)).with_request(ViewRequest::of(name(target)))
    }

    #[rstest]
    #[case(&["m::A", "m::B"])]
    #[case(&["m::B", "m::A"])]
    fn smallest_name_wins_regardless_of_order(#[case] order: &[&str]) {
        let bearers: Vec<_> = order.iter().map(|path| bearer(path, "m::Person")).collect();
        let target = name("m::Person");
        assert_eq!(select(&bearers, &target), Some(&name("m::A")));
    }

    #[rstest]
    fn bearers_of_other_targets_do_not_compete() {
        let bearers = vec![bearer("m::A", "m::Other"), bearer("m::B", "m::Person")];
        let target = name("m::Person");
        assert_eq!(select(&bearers, &target), Some(&name("m::B")));
        assert_eq!(competitors(&bearers, &target).count(), 1);
    }

    #[rstest]
    fn self_requests_compete_for_their_bearer() {
        let bearers = vec![
            ConfigBearer::new(name("m::Person")).with_request(ViewRequest::default()),
            bearer("z::PersonConfig", "m::Person"),
        ];
        let target = name("m::Person");
        assert_eq!(select(&bearers, &target), Some(&name("m::Person")));
    }

    #[rstest]
    fn meta_requests_compete_separately_from_views() {
        let target = name("m::Person");
        let bearers = vec![
            bearer("m::A", "m::Person"),
            ConfigBearer::new(name("m::C")).with_meta(MetaRequest::of(target.clone())),
            ConfigBearer::new(name("m::B")).with_meta(MetaRequest::of(target.clone())),
        ];
        assert_eq!(select(&bearers, &target), Some(&name("m::A")));
        assert_eq!(select_meta(&bearers, &target), Some(&name("m::B")));
        assert_eq!(select_meta(&bearers, &name("m::Other")), None);
    }
}
