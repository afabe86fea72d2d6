//! The resolution engine.
//!
//! One round walks every request of every configuration bearer in order:
//!
//! 1. the winner check defers requests whose bearer is not the
//!    lexicographically smallest competitor for the target;
//! 2. requests whose generated name was already produced are skipped;
//! 3. the members of the target are filtered by every contributing request
//!    and customised by the config type;
//! 4. the finished view is rendered and emitted as one unit.
//!
//! Meta requests follow the same steps with their own winner among the
//! bearers describing the target; see [`ResolvedMeta`].
//!
//! No failure escapes a single request: errors become diagnostics and the
//! round carries on with the next request.

mod materialize;
mod merge;
mod meta;
mod winner;

use std::collections::{BTreeSet, HashSet};

use proc_macro2::Span;

use crate::config::EngineConfig;
use crate::diagnostics::Diagnostics;
use crate::emit::EmissionSink;
use crate::error::ViewError;
use crate::model::Property;
use crate::names::QualifiedName;
use crate::render::Renderer;
use crate::request::{ConfigBearer, ViewRequest};
use crate::type_model::TypeModel;
use crate::types::ident;

use materialize::Materializer;

pub use meta::ResolvedMeta;

/// Qualified names generated so far in one compilation.
///
/// The set only grows; callers keep it alive across rounds.
#[derive(Debug, Clone, Default)]
pub struct GeneratedNames(BTreeSet<QualifiedName>);

impl GeneratedNames {
    /// Returns `true` when `name` was already generated.
    #[must_use]
    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.0.contains(name)
    }

    /// Records `name`; returns `false` when it was already present.
    pub fn insert(&mut self, name: QualifiedName) -> bool {
        self.0.insert(name)
    }

    /// Number of generated names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing was generated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Generated names in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &QualifiedName> {
        self.0.iter()
    }
}

/// A view ready for rendering.
#[derive(Debug, Clone)]
pub struct ResolvedView {
    /// Qualified name of the generated type.
    pub name: QualifiedName,
    /// Source type being viewed.
    pub target: QualifiedName,
    /// Type whose customisations were applied.
    pub config: QualifiedName,
    /// The winning request; type and constructor settings come from it.
    pub request: ViewRequest,
    /// Properties in declaration order, new properties last.
    pub properties: Vec<Property>,
    /// Messages of properties dropped during resolution.
    pub errors: Vec<String>,
    /// Documentation of the target type.
    pub comment: Option<String>,
}

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// The view was rendered and emitted.
    Rendered,
    /// Another bearer has priority for the target.
    Deferred {
        /// The bearer that generates the target's views instead.
        winner: QualifiedName,
    },
    /// The generated name was already produced.
    SkippedDuplicate,
    /// Resolution, rendering or emission failed.
    Failed,
}

/// Kind of type a request generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A view of the target.
    View,
    /// The member-name constants of the target.
    Meta,
}

/// What happened to one request of the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    /// Bearer carrying the request.
    pub bearer: QualifiedName,
    /// What the request generates.
    pub kind: UnitKind,
    /// Resolved target type.
    pub target: QualifiedName,
    /// Name of the view the request asks for.
    pub generated: QualifiedName,
    /// Terminal state.
    pub state: TargetState,
}

/// Outcomes and diagnostics of one round.
#[derive(Debug, Clone, Default)]
pub struct RoundReport {
    /// One entry per request, in processing order.
    pub outcomes: Vec<TargetOutcome>,
    /// Every diagnostic recorded during the round.
    pub diagnostics: Diagnostics,
}

impl RoundReport {
    /// Returns `true` when an ERROR was recorded; the build should fail.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Names of the views and meta types emitted this round.
    pub fn rendered(&self) -> impl Iterator<Item = &QualifiedName> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state == TargetState::Rendered)
            .map(|outcome| &outcome.generated)
    }

    /// Converts a report holding errors into [`ViewError::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Failed`] summarising every ERROR diagnostic.
    pub fn into_result(self) -> Result<Self, ViewError> {
        if !self.has_errors() {
            return Ok(self);
        }
        let errors: Vec<String> = self
            .diagnostics
            .of(crate::diagnostics::Severity::Error)
            .map(ToString::to_string)
            .collect();
        Err(ViewError::Failed {
            count: errors.len(),
            summary: errors.join("\n"),
        })
    }
}

/// Resolves view requests against a type model.
///
/// # Examples
///
/// ```
/// use view_synth_core::{
///     ConfigBearer, Engine, EngineConfig, GeneratedNames, InMemoryTypeModel, Member,
///     MemorySink, QualifiedName, RustRenderer, TypeInfo, TypeRef, ViewRequest,
/// };
///
/// let person = QualifiedName::parse("crate::Person").expect("name");
/// let mut model = InMemoryTypeModel::default();
/// model.insert(
///     TypeInfo::new(person.clone())
///         .with_member(Member::field("name", TypeRef::parse("String").expect("type"))),
/// );
/// let bearers = [ConfigBearer::new(person.clone())
///     .with_request(ViewRequest::default().including(["name"]))];
///
/// let config = EngineConfig::default();
/// let engine = Engine::new(config.clone()).expect("engine");
/// let renderer = RustRenderer::from_config(&config).expect("renderer");
/// let mut sink = MemorySink::default();
/// let report = engine.run(&model, &bearers, &mut GeneratedNames::default(), &renderer, &mut sink);
///
/// assert!(!report.has_errors());
/// assert_eq!(sink.units().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    runtime: syn::Path,
}

impl Engine {
    /// Builds an engine for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidName`] when the configured runtime path
    /// does not parse.
    pub fn new(config: EngineConfig) -> Result<Self, ViewError> {
        let runtime = config.runtime_path()?;
        Ok(Self { config, runtime })
    }

    /// Settings the engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one round over `bearers`, emitting every rendered view to `sink`.
    pub fn run<M, R, S>(
        &self,
        model: &M,
        bearers: &[ConfigBearer],
        generated: &mut GeneratedNames,
        renderer: &R,
        sink: &mut S,
    ) -> RoundReport
    where
        M: TypeModel + ?Sized,
        R: Renderer + ?Sized,
        S: EmissionSink + ?Sized,
    {
        let mut report = RoundReport::default();
        for bearer in bearers {
            for request in &bearer.requests {
                let state = self.process(
                    model,
                    bearers,
                    bearer,
                    request,
                    generated,
                    renderer,
                    sink,
                    &mut report.diagnostics,
                );
                report.outcomes.push(TargetOutcome {
                    bearer: bearer.name.clone(),
                    kind: UnitKind::View,
                    target: request.resolved_target(&bearer.name),
                    generated: request.generated_name(&bearer.name, &self.config.view_suffix),
                    state,
                });
            }
            for request in &bearer.metas {
                let state = self.process_meta(
                    model,
                    bearers,
                    bearer,
                    request,
                    generated,
                    renderer,
                    sink,
                    &mut report.diagnostics,
                );
                report.outcomes.push(TargetOutcome {
                    bearer: bearer.name.clone(),
                    kind: UnitKind::Meta,
                    target: request.resolved_target(&bearer.name),
                    generated: request.generated_name(&bearer.name, &self.config.meta_suffix),
                    state,
                });
            }
        }
        report
    }

    #[expect(
        clippy::too_many_arguments,
        reason = "one request is processed against the whole round context"
    )]
    fn process<M, R, S>(
        &self,
        model: &M,
        bearers: &[ConfigBearer],
        bearer: &ConfigBearer,
        request: &ViewRequest,
        generated: &mut GeneratedNames,
        renderer: &R,
        sink: &mut S,
        diagnostics: &mut Diagnostics,
    ) -> TargetState
    where
        M: TypeModel + ?Sized,
        R: Renderer + ?Sized,
        S: EmissionSink + ?Sized,
    {
        let target = request.resolved_target(&bearer.name);
        let name = request.generated_name(&bearer.name, &self.config.view_suffix);

        if let Some(winner) = winner::select(bearers, &target)
            && winner != &bearer.name
        {
            diagnostics.warn(
                Some(&bearer.name),
                Some(&target),
                winner::deferral_message(&name, &bearer.name, winner, &target),
            );
            tracing::debug!(view = %name, winner = %winner, "view deferred");
            return TargetState::Deferred {
                winner: winner.clone(),
            };
        }

        if generated.contains(&name) {
            diagnostics.warn(
                Some(&bearer.name),
                Some(&target),
                format!("Repeated view request with generated name: {name}."),
            );
            tracing::debug!(view = %name, "duplicate view skipped");
            return TargetState::SkippedDuplicate;
        }

        let rendered = self
            .resolve(model, bearers, bearer, request, diagnostics)
            .and_then(|view| renderer.render(&view));
        let state = finish(rendered, &name, &bearer.name, &target, generated, sink, diagnostics);
        if state == TargetState::Rendered {
            tracing::info!(view = %name, target = %target, "generated view");
        }
        state
    }

    /// Resolves one request of `bearer` into a view without rendering it.
    ///
    /// Property-level failures are recorded in `diagnostics` and drop only
    /// the property concerned.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Configuration`] when the target cannot be viewed
    /// or the resulting properties clash, and [`ViewError::InvalidPattern`]
    /// for a contributing pattern that does not compile.
    pub fn resolve<M>(
        &self,
        model: &M,
        bearers: &[ConfigBearer],
        bearer: &ConfigBearer,
        request: &ViewRequest,
        diagnostics: &mut Diagnostics,
    ) -> Result<ResolvedView, ViewError>
    where
        M: TypeModel + ?Sized,
    {
        let target = request.resolved_target(&bearer.name);
        let config = request.resolved_config(&bearer.name);
        let name = request.generated_name(&bearer.name, &self.config.view_suffix);
        check_generated_name(&name, &target)?;

        let info = model
            .type_info(&target)
            .ok_or_else(|| ViewError::configuration(&target, "the type is unknown"))?;
        if info.generic {
            return Err(ViewError::configuration(
                &target,
                "generic types cannot be viewed",
            ));
        }
        if request.type_access.is_none() {
            return Err(ViewError::configuration(
                &target,
                format!("the view \"{name}\" must not have access NONE"),
            ));
        }
        let config_bearer = bearers.iter().find(|candidate| candidate.name == config);
        if config_bearer.is_none() && model.type_info(&config).is_none() {
            return Err(ViewError::configuration(
                &target,
                format!("the config type \"{config}\" is unknown"),
            ));
        }

        let mut properties = merge::base_properties(
            info,
            merge::contributing(bearers, &target, &config),
            request,
        )?;
        let errors = match config_bearer {
            Some(customised) => Materializer {
                target: &target,
                info,
                config: &config,
                scope: name.module(),
                runtime: &self.runtime,
                default_getters: request.getters,
            }
            .apply(customised, &mut properties, diagnostics),
            None => Vec::new(),
        };

        let mut seen = HashSet::new();
        if let Some(clash) = properties
            .iter()
            .map(Property::name)
            .find(|property| !seen.insert(*property))
        {
            return Err(ViewError::configuration(
                &target,
                format!("the view \"{name}\" defines the property \"{clash}\" more than once"),
            ));
        }

        tracing::debug!(
            view = %name,
            properties = properties.len(),
            dropped = errors.len(),
            "resolved view"
        );
        Ok(ResolvedView {
            name,
            target,
            config,
            request: request.clone(),
            properties,
            errors,
            comment: info.comment.clone(),
        })
    }
}

/// Emits successfully rendered tokens and records the generated name; any
/// failure along the way becomes an ERROR on `bearer`.
fn finish<S>(
    rendered: Result<proc_macro2::TokenStream, ViewError>,
    name: &QualifiedName,
    bearer: &QualifiedName,
    target: &QualifiedName,
    generated: &mut GeneratedNames,
    sink: &mut S,
    diagnostics: &mut Diagnostics,
) -> TargetState
where
    S: EmissionSink + ?Sized,
{
    let emitted = rendered.and_then(|tokens| {
        sink.emit(name, tokens).map_err(|source| ViewError::Emit {
            view: name.clone(),
            source,
        })
    });
    match emitted {
        Ok(()) => {
            generated.insert(name.clone());
            TargetState::Rendered
        }
        Err(err) => {
            diagnostics.error(Some(bearer), Some(target), err.to_string());
            TargetState::Failed
        }
    }
}

/// Generated names are written out as type names.
fn check_generated_name(name: &QualifiedName, target: &QualifiedName) -> Result<(), ViewError> {
    ident(name.simple_name(), Span::call_site())
        .map(drop)
        .map_err(|_| {
            ViewError::configuration(
                target,
                format!(
                    "the generated name \"{}\" is not a valid Rust identifier",
                    name.simple_name()
                ),
            )
        })
}

#[cfg(test)]
mod tests;
