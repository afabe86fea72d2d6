//! Round-level behaviour of the resolution engine.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

use super::*;
use crate::access::Access;
use crate::diagnostics::Severity;
use crate::emit::MemorySink;
use crate::extract::FunctionSig;
use crate::model::{Member, TypeInfo};
use crate::render::RustRenderer;
use crate::request::{ConverterSpec, MetaRequest, NewProperty, PropertyOverride, TypeSelector};
use crate::type_model::InMemoryTypeModel;
use crate::types::TypeRef;

fn name(path: &str) -> QualifiedName {
    QualifiedName::parse(path).expect("valid name")
}

fn ty(source: &str) -> TypeRef {
    TypeRef::parse(source).expect("valid type")
}

#[fixture]
fn model() -> InMemoryTypeModel {
    let mut model = InMemoryTypeModel::default();
    model.insert(
        TypeInfo::new(name("crate::model::Person"))
            .with_member(Member::field("name", ty("String")))
            .with_member(Member::field("age", ty("i32")))
            .with_member(Member::method("initials", ty("String"))),
    );
    model.insert(TypeInfo::new(name("crate::model::PersonConfig")));
    model
}

#[fixture]
fn engine() -> Engine {
    Engine::new(EngineConfig::default()).expect("default config")
}

fn renderer() -> RustRenderer {
    RustRenderer::from_config(&EngineConfig::default()).expect("default config")
}

fn person_request() -> ViewRequest {
    ViewRequest::of(name("crate::model::Person")).including(["name", "age"])
}

fn run(engine: &Engine, model: &InMemoryTypeModel, bearers: &[ConfigBearer]) -> (RoundReport, MemorySink) {
    let mut sink = MemorySink::default();
    let report = engine.run(
        model,
        bearers,
        &mut GeneratedNames::default(),
        &renderer(),
        &mut sink,
    );
    (report, sink)
}

fn resolve_single(
    engine: &Engine,
    model: &InMemoryTypeModel,
    bearer: &ConfigBearer,
) -> Result<(ResolvedView, Diagnostics)> {
    let request = bearer
        .requests
        .first()
        .ok_or_else(|| anyhow!("bearer without request"))?;
    let mut diagnostics = Diagnostics::default();
    let view = engine.resolve(model, std::slice::from_ref(bearer), bearer, request, &mut diagnostics)?;
    Ok((view, diagnostics))
}

fn property<'a>(view: &'a ResolvedView, property: &str) -> Result<&'a Property> {
    view.properties
        .iter()
        .find(|candidate| candidate.name() == property)
        .ok_or_else(|| anyhow!("property {property} missing"))
}

#[rstest]
fn person_scenario_yields_two_read_only_properties(
    engine: Engine,
    model: InMemoryTypeModel,
) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto")).with_request(person_request());
    let (view, diagnostics) = resolve_single(&engine, &model, &bearer)?;

    ensure!(diagnostics.is_empty());
    ensure!(view.name == name("crate::model::PersonView"));
    let names: Vec<_> = view.properties.iter().map(Property::name).collect();
    ensure!(names == ["name", "age"], "got {names:?}");
    ensure!(view.properties.iter().all(Property::has_getter));
    ensure!(view.properties.iter().all(|p| !p.has_setter()));
    ensure!(view.request.empty_ctor == Access::Public);
    ensure!(view.request.fields_ctor == Access::Public);
    Ok(())
}

#[rstest]
fn smaller_bearer_wins_and_loser_is_warned(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearers = [
        ConfigBearer::new(name("crate::dto::A")).with_request(person_request()),
        ConfigBearer::new(name("crate::dto::B")).with_request(person_request()),
    ];
    let (report, sink) = run(&engine, &model, &[bearers[1].clone(), bearers[0].clone()]);

    ensure!(sink.units().len() == 1);
    ensure!(!report.has_errors());
    let deferred = report
        .outcomes
        .iter()
        .find(|outcome| outcome.bearer == name("crate::dto::B"))
        .ok_or_else(|| anyhow!("B outcome missing"))?;
    ensure!(
        deferred.state
            == TargetState::Deferred {
                winner: name("crate::dto::A")
            }
    );
    let warning = report
        .diagnostics
        .of(Severity::Warning)
        .next()
        .ok_or_else(|| anyhow!("no warning"))?;
    ensure!(
        warning.message
            == "The view \"crate::model::PersonView\" configured on \"crate::dto::B\" will not be \
                generated, because \"crate::dto::A\" has configured a view of \
                \"crate::model::Person\" and has a higher priority.",
        "got {}",
        warning.message
    );
    Ok(())
}

#[rstest]
fn output_is_identical_across_runs_and_discovery_orders(
    engine: Engine,
    model: InMemoryTypeModel,
) -> Result<()> {
    let bearers = vec![
        ConfigBearer::new(name("crate::dto::B")).with_request(person_request()),
        ConfigBearer::new(name("crate::dto::A")).with_request(person_request()),
    ];
    let mut reversed = bearers.clone();
    reversed.reverse();

    let (_, first) = run(&engine, &model, &bearers);
    let (_, second) = run(&engine, &model, &bearers);
    let (_, third) = run(&engine, &model, &reversed);
    let first = first.into_tokens().to_string();
    ensure!(first == second.into_tokens().to_string());
    ensure!(first == third.into_tokens().to_string());
    Ok(())
}

#[rstest]
fn repeated_generated_name_is_skipped(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearers = [ConfigBearer::new(name("crate::dto::A"))
        .with_request(person_request())
        .with_request(person_request())];
    let (report, sink) = run(&engine, &model, &bearers);

    ensure!(sink.units().len() == 1);
    let states: Vec<_> = report.outcomes.iter().map(|o| o.state.clone()).collect();
    ensure!(states == [TargetState::Rendered, TargetState::SkippedDuplicate]);
    ensure!(
        report
            .diagnostics
            .iter()
            .any(|d| d.message == "Repeated view request with generated name: crate::model::PersonView.")
    );
    Ok(())
}

#[rstest]
fn generated_names_persist_across_rounds(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearers = [ConfigBearer::new(name("crate::dto::A")).with_request(person_request())];
    let mut generated = GeneratedNames::default();
    let mut sink = MemorySink::default();
    engine.run(&model, &bearers, &mut generated, &renderer(), &mut sink);
    let second = engine.run(&model, &bearers, &mut generated, &renderer(), &mut sink);

    ensure!(generated.len() == 1);
    ensure!(sink.units().len() == 1);
    ensure!(second.outcomes.iter().all(|o| o.state == TargetState::SkippedDuplicate));
    Ok(())
}

#[rstest]
fn requests_sharing_target_and_config_are_merged(
    engine: Engine,
    model: InMemoryTypeModel,
) -> Result<()> {
    let target = name("crate::model::Person");
    let config: TypeSelector = name("crate::model::PersonConfig").into();
    let bearers = [
        ConfigBearer::new(name("crate::dto::A")).with_request(ViewRequest {
            config: config.clone(),
            ..ViewRequest::of(target.clone()).including(["name"])
        }),
        ConfigBearer::new(name("crate::dto::B")).with_request(ViewRequest {
            config,
            gen_name: Some(String::from("PersonSummary")),
            ..ViewRequest::of(target).including(["age"])
        }),
    ];
    let bearer = &bearers[0];
    let mut diagnostics = Diagnostics::default();
    let view = engine.resolve(&model, &bearers, bearer, &bearer.requests[0], &mut diagnostics)?;
    let names: Vec<_> = view.properties.iter().map(Property::name).collect();
    ensure!(names == ["name", "age"], "got {names:?}");
    Ok(())
}

#[rstest]
fn exclude_pattern_beats_include_pattern(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::A")).with_request(ViewRequest {
        include_pattern: Some(String::from("[a-z]+")),
        exclude_pattern: Some(String::from("a.*")),
        ..ViewRequest::of(name("crate::model::Person"))
    });
    let (view, _) = resolve_single(&engine, &model, &bearer)?;
    let names: Vec<_> = view.properties.iter().map(Property::name).collect();
    ensure!(names == ["name", "initials"], "got {names:?}");
    Ok(())
}

#[rstest]
fn two_parameter_function_is_rejected(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let function = FunctionSig::new(
        name("crate::dto::PersonDto"),
        "full_name",
        vec![ty("&Person"), ty("&str")],
        ty("String"),
    );
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request())
        .with_new_property(NewProperty {
            name: String::from("full_name"),
            function,
            getter: None,
            setter: None,
        });
    let (report, sink) = run(&engine, &model, std::slice::from_ref(&bearer));

    ensure!(report.has_errors());
    let error = report
        .diagnostics
        .of(Severity::Error)
        .next()
        .ok_or_else(|| anyhow!("no error"))?;
    ensure!(error.message.contains("\"full_name\" has too many parameters"));
    ensure!(error.message.contains("fn full_name(source: &Person) -> String"));
    ensure!(
        sink.units().len() == 1,
        "the rest of the view is still generated"
    );

    let (view, _) = resolve_single(&engine, &model, &bearer)?;
    ensure!(view.properties.len() == 2);
    ensure!(view.errors.len() == 1);
    Ok(())
}

#[rstest]
fn new_property_is_computed_and_read_only(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let function = FunctionSig::new(
        name("crate::dto::PersonDto"),
        "greeting",
        vec![ty("&crate::model::Person")],
        ty("String"),
    );
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request())
        .with_new_property(NewProperty {
            name: String::from("greeting"),
            function,
            getter: Some(Access::Package),
            setter: None,
        });
    let (view, diagnostics) = resolve_single(&engine, &model, &bearer)?;
    ensure!(diagnostics.is_empty());
    let greeting = property(&view, "greeting")?;
    ensure!(greeting.getter_access() == Access::Package);
    ensure!(!greeting.has_setter());
    ensure!(!greeting.is_dynamic(), "functions of the source are evaluated once");
    ensure!(greeting.declared_type() == &ty("String"));
    Ok(())
}

#[rstest]
fn overrides_adjust_accessors_type_and_name(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request())
        .with_override(PropertyOverride {
            setter: Some(Access::Public),
            rename: Some(String::from("full_name")),
            ..PropertyOverride::named("name")
        })
        .with_override(PropertyOverride {
            converter: Some(ConverterSpec {
                path: syn::parse_quote!(crate::convert::AgeToText),
                output: Some(ty("String")),
            }),
            getter: Some(Access::None),
            ..PropertyOverride::named("age")
        });
    let (view, diagnostics) = resolve_single(&engine, &model, &bearer)?;
    ensure!(diagnostics.is_empty());

    let full_name = property(&view, "full_name")?;
    ensure!(full_name.setter_access() == Access::Public);
    let age = property(&view, "age")?;
    ensure!(!age.has_getter());
    ensure!(age.declared_type() == &ty("String"));
    ensure!(age.converter().is_some());
    Ok(())
}

#[rstest]
fn setter_on_read_only_member_drops_the_property(
    engine: Engine,
    model: InMemoryTypeModel,
) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request().including(["initials"]))
        .with_override(PropertyOverride {
            setter: Some(Access::Public),
            ..PropertyOverride::named("initials")
        });
    let (view, diagnostics) = resolve_single(&engine, &model, &bearer)?;
    ensure!(diagnostics.has_errors());
    ensure!(property(&view, "initials").is_err());
    ensure!(view.errors.iter().any(|e| e.contains("read-only")));
    Ok(())
}

#[rstest]
fn override_of_unknown_member_warns(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request())
        .with_override(PropertyOverride::named("nickname"));
    let (view, diagnostics) = resolve_single(&engine, &model, &bearer)?;
    ensure!(!diagnostics.has_errors());
    ensure!(diagnostics.of(Severity::Warning).count() == 1);
    ensure!(view.properties.len() == 2);
    Ok(())
}

#[rstest]
fn clashing_property_names_fail_the_target(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request())
        .with_override(PropertyOverride {
            rename: Some(String::from("age")),
            ..PropertyOverride::named("name")
        });
    let mut diagnostics = Diagnostics::default();
    let err = engine
        .resolve(&model, std::slice::from_ref(&bearer), &bearer, &bearer.requests[0], &mut diagnostics)
        .expect_err("duplicate property");
    ensure!(err.to_string().contains("\"age\" more than once"));
    Ok(())
}

#[rstest]
fn failed_target_does_not_block_the_round(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearers = [
        ConfigBearer::new(name("crate::dto::A"))
            .with_request(ViewRequest::of(name("crate::model::Missing")).including(["x"])),
        ConfigBearer::new(name("crate::dto::B")).with_request(person_request()),
    ];
    let (report, sink) = run(&engine, &model, &bearers);
    ensure!(report.has_errors());
    ensure!(sink.units().len() == 1);
    let states: Vec<_> = report.outcomes.iter().map(|o| o.state.clone()).collect();
    ensure!(states == [TargetState::Failed, TargetState::Rendered]);
    ensure!(report.into_result().is_err());
    Ok(())
}

#[rstest]
#[case::generic(true, Access::Public)]
#[case::hidden_type(false, Access::None)]
fn malformed_targets_are_configuration_errors(
    engine: Engine,
    #[case] generic: bool,
    #[case] type_access: Access,
) {
    let target = name("crate::model::Pair");
    let mut model = InMemoryTypeModel::default();
    let mut info = TypeInfo::new(target.clone()).with_member(Member::field("left", ty("u8")));
    info.generic = generic;
    model.insert(info);
    let bearer = ConfigBearer::new(name("crate::dto::PairDto")).with_request(ViewRequest {
        type_access,
        ..ViewRequest::of(target)
    });
    let mut diagnostics = Diagnostics::default();
    let result = engine.resolve(
        &model,
        std::slice::from_ref(&bearer),
        &bearer,
        &bearer.requests[0],
        &mut diagnostics,
    );
    assert!(matches!(result, Err(ViewError::Configuration { .. })));
}

#[rstest]
#[case::keyword_rename(Some("self"), None)]
#[case::digit_rename(Some("1st"), None)]
#[case::dashed_rename(Some("full-name"), None)]
#[case::path_keyword_addition(None, Some("crate"))]
fn unwritable_property_names_drop_only_that_property(
    engine: Engine,
    model: InMemoryTypeModel,
    #[case] rename: Option<&str>,
    #[case] addition: Option<&str>,
) -> Result<()> {
    let mut bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(person_request())
        .with_override(PropertyOverride {
            rename: rename.map(String::from),
            ..PropertyOverride::named("name")
        });
    if let Some(label) = addition {
        bearer = bearer.with_new_property(NewProperty {
            name: label.to_owned(),
            function: FunctionSig::new(
                name("crate::dto::PersonDto"),
                "label",
                vec![ty("&crate::model::Person")],
                ty("String"),
            ),
            getter: None,
            setter: None,
        });
    }
    let (report, sink) = run(&engine, &model, std::slice::from_ref(&bearer));

    let errors: Vec<_> = report.diagnostics.of(Severity::Error).collect();
    ensure!(errors.len() == 1, "{errors:?}");
    ensure!(
        errors
            .first()
            .is_some_and(|error| error.message.contains("is not a valid Rust identifier")),
        "{errors:?}"
    );
    ensure!(report.outcomes.iter().all(|o| o.state == TargetState::Rendered));
    ensure!(sink.get(&name("crate::model::PersonView")).is_some());

    let (view, _) = resolve_single(&engine, &model, &bearer)?;
    ensure!(view.errors.len() == 1);
    let expected: &[&str] = if rename.is_some() { &["age"] } else { &["name", "age"] };
    let names: Vec<_> = view.properties.iter().map(Property::name).collect();
    ensure!(names == expected, "got {names:?}");
    Ok(())
}

#[rstest]
fn unwritable_generated_name_fails_only_its_target(
    engine: Engine,
    model: InMemoryTypeModel,
) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(ViewRequest {
            gen_name: Some(String::from("1View")),
            ..person_request()
        })
        .with_request(ViewRequest {
            gen_name: Some(String::from("PersonSummary")),
            ..person_request()
        });
    let (report, sink) = run(&engine, &model, &[bearer]);

    let states: Vec<_> = report.outcomes.iter().map(|o| o.state.clone()).collect();
    ensure!(states == [TargetState::Failed, TargetState::Rendered], "got {states:?}");
    ensure!(sink.get(&name("crate::model::PersonSummary")).is_some());
    let error = report
        .diagnostics
        .of(Severity::Error)
        .next()
        .ok_or_else(|| anyhow!("no error"))?;
    ensure!(
        error.message
            == "invalid view configuration for 'crate::model::Person': the generated name \
                \"1View\" is not a valid Rust identifier",
        "got {}",
        error.message
    );
    Ok(())
}

#[rstest]
fn unwritable_suffix_fails_every_target(model: InMemoryTypeModel) -> Result<()> {
    let engine = Engine::new(EngineConfig {
        view_suffix: String::from("-Dto"),
        ..EngineConfig::default()
    })?;
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto")).with_request(person_request());
    let (report, sink) = run(&engine, &model, &[bearer]);
    ensure!(sink.units().is_empty());
    ensure!(report.outcomes.iter().all(|o| o.state == TargetState::Failed));
    ensure!(report.diagnostics.of(Severity::Error).count() == 1);
    Ok(())
}

fn person_meta() -> MetaRequest {
    MetaRequest::of(name("crate::model::Person"))
}

#[rstest]
fn meta_lists_every_member_in_order(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto")).with_meta(person_meta());
    let meta = engine.resolve_meta(&model, &bearer, &person_meta())?;
    ensure!(meta.name == name("crate::model::PersonMeta"));
    ensure!(meta.members == ["name", "age", "initials"], "got {:?}", meta.members);

    let (report, sink) = run(&engine, &model, &[bearer]);
    ensure!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    ensure!(sink.get(&name("crate::model::PersonMeta")).is_some());
    let outcome = report.outcomes.first().ok_or_else(|| anyhow!("no outcome"))?;
    ensure!(outcome.kind == UnitKind::Meta);
    ensure!(outcome.state == TargetState::Rendered);
    Ok(())
}

#[rstest]
fn smaller_meta_bearer_wins_independently_of_views(
    engine: Engine,
    model: InMemoryTypeModel,
) -> Result<()> {
    let bearers = [
        ConfigBearer::new(name("crate::dto::A")).with_request(person_request()),
        ConfigBearer::new(name("crate::dto::B")).with_meta(person_meta()),
        ConfigBearer::new(name("crate::dto::C")).with_meta(MetaRequest {
            gen_name: Some(String::from("PersonFields")),
            ..person_meta()
        }),
    ];
    let (report, sink) = run(&engine, &model, &bearers);

    ensure!(sink.units().len() == 2, "the view and one meta type");
    ensure!(sink.get(&name("crate::model::PersonMeta")).is_some());
    let states: Vec<_> = report.outcomes.iter().map(|o| (o.kind, o.state.clone())).collect();
    ensure!(
        states
            == [
                (UnitKind::View, TargetState::Rendered),
                (UnitKind::Meta, TargetState::Rendered),
                (
                    UnitKind::Meta,
                    TargetState::Deferred {
                        winner: name("crate::dto::B")
                    }
                ),
            ],
        "got {states:?}"
    );
    let warning = report
        .diagnostics
        .of(Severity::Warning)
        .next()
        .ok_or_else(|| anyhow!("no warning"))?;
    ensure!(
        warning.message
            == "The meta type \"crate::model::PersonFields\" configured on \"crate::dto::C\" will \
                not be generated, because \"crate::dto::B\" has configured a similar meta type and \
                has a higher priority.",
        "got {}",
        warning.message
    );
    Ok(())
}

#[rstest]
fn repeated_meta_names_are_skipped(engine: Engine, model: InMemoryTypeModel) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_request(ViewRequest {
            gen_name: Some(String::from("PersonFields")),
            ..person_request()
        })
        .with_meta(person_meta())
        .with_meta(person_meta())
        .with_meta(MetaRequest {
            gen_name: Some(String::from("PersonFields")),
            ..person_meta()
        });
    let (report, sink) = run(&engine, &model, &[bearer]);

    ensure!(!report.has_errors());
    ensure!(sink.units().len() == 2);
    let states: Vec<_> = report.outcomes.iter().map(|o| o.state.clone()).collect();
    ensure!(
        states
            == [
                TargetState::Rendered,
                TargetState::Rendered,
                TargetState::SkippedDuplicate,
                TargetState::SkippedDuplicate,
            ],
        "got {states:?}"
    );
    let warnings: Vec<_> = report
        .diagnostics
        .of(Severity::Warning)
        .map(|warning| warning.message.as_str())
        .collect();
    ensure!(
        warnings
            == [
                "Repeated meta request with generated name: crate::model::PersonMeta.",
                "Repeated meta request with generated name: crate::model::PersonFields.",
            ],
        "got {warnings:?}"
    );
    Ok(())
}

#[rstest]
#[case::unknown_target("crate::model::Missing", Access::Public)]
#[case::no_access("crate::model::Person", Access::None)]
fn malformed_meta_requests_fail_their_target(
    engine: Engine,
    model: InMemoryTypeModel,
    #[case] target: &str,
    #[case] type_access: Access,
) -> Result<()> {
    let bearer = ConfigBearer::new(name("crate::dto::PersonDto"))
        .with_meta(MetaRequest {
            type_access,
            ..MetaRequest::of(name(target))
        })
        .with_request(person_request());
    let (report, sink) = run(&engine, &model, &[bearer]);
    ensure!(sink.units().len() == 1, "the view is still generated");
    let states: Vec<_> = report.outcomes.iter().map(|o| (o.kind, o.state.clone())).collect();
    ensure!(
        states == [(UnitKind::View, TargetState::Rendered), (UnitKind::Meta, TargetState::Failed)],
        "got {states:?}"
    );
    ensure!(report.diagnostics.of(Severity::Error).count() == 1);
    Ok(())
}
