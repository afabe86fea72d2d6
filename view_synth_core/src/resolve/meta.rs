//! Meta types: one string constant per member name of a target.
//!
//! Meta requests compete among themselves for a target, independently of
//! view requests, and share the round's [`GeneratedNames`] with views.

use crate::access::Access;
use crate::diagnostics::Diagnostics;
use crate::emit::EmissionSink;
use crate::error::ViewError;
use crate::names::QualifiedName;
use crate::render::Renderer;
use crate::request::{ConfigBearer, MetaRequest};
use crate::type_model::TypeModel;

use super::{Engine, GeneratedNames, TargetState, check_generated_name, finish, winner};

/// A meta type ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMeta {
    /// Qualified name of the generated type.
    pub name: QualifiedName,
    /// Type whose members are listed.
    pub target: QualifiedName,
    /// Visibility of the generated type.
    pub type_access: Access,
    /// Member names in declaration order.
    pub members: Vec<String>,
}

impl Engine {
    #[expect(
        clippy::too_many_arguments,
        reason = "one request is processed against the whole round context"
    )]
    pub(super) fn process_meta<M, R, S>(
        &self,
        model: &M,
        bearers: &[ConfigBearer],
        bearer: &ConfigBearer,
        request: &MetaRequest,
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
        let name = request.generated_name(&bearer.name, &self.config.meta_suffix);

        if let Some(winner) = winner::select_meta(bearers, &target)
            && winner != &bearer.name
        {
            diagnostics.warn(
                Some(&bearer.name),
                Some(&target),
                winner::meta_deferral_message(&name, &bearer.name, winner),
            );
            tracing::debug!(meta = %name, winner = %winner, "meta type deferred");
            return TargetState::Deferred {
                winner: winner.clone(),
            };
        }

        if generated.contains(&name) {
            diagnostics.warn(
                Some(&bearer.name),
                Some(&target),
                format!("Repeated meta request with generated name: {name}."),
            );
            tracing::debug!(meta = %name, "duplicate meta type skipped");
            return TargetState::SkippedDuplicate;
        }

        let rendered = self
            .resolve_meta(model, bearer, request)
            .and_then(|meta| renderer.render_meta(&meta));
        let state = finish(rendered, &name, &bearer.name, &target, generated, sink, diagnostics);
        if state == TargetState::Rendered {
            tracing::info!(meta = %name, target = %target, "generated meta type");
        }
        state
    }

    /// Resolves one meta request of `bearer` without rendering it.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Configuration`] when the target is unknown, the
    /// generated name is not an identifier, or the type access is NONE.
    pub fn resolve_meta<M>(
        &self,
        model: &M,
        bearer: &ConfigBearer,
        request: &MetaRequest,
    ) -> Result<ResolvedMeta, ViewError>
    where
        M: TypeModel + ?Sized,
    {
        let target = request.resolved_target(&bearer.name);
        let name = request.generated_name(&bearer.name, &self.config.meta_suffix);
        check_generated_name(&name, &target)?;

        let info = model
            .type_info(&target)
            .ok_or_else(|| ViewError::configuration(&target, "the type is unknown"))?;
        if request.type_access.is_none() {
            return Err(ViewError::configuration(
                &target,
                format!("the meta type \"{name}\" must not have access NONE"),
            ));
        }
        Ok(ResolvedMeta {
            name,
            target,
            type_access: request.type_access,
            members: info.members.iter().map(|member| member.name.clone()).collect(),
        })
    }
}
