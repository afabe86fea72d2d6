//! Resolution engine behind the `view_synth` view generator.
//!
//! Given source types and declarative requests attached to them, the engine
//! derives reduced *view* types: projections exposing a chosen subset of
//! members with configurable accessors, custom extraction and conversion.
//!
//! The pieces, leaves first:
//!
//! - a [`TypeModel`] answers what members a type declares;
//! - [`Extractor`]s and [`Converter`]s describe how a value is produced;
//! - [`Property`] is the immutable description of one view member;
//! - the [`Engine`] picks the winning request per target, merges included
//!   members and applies per-property customisation;
//! - a [`Renderer`] turns the result into tokens and an [`EmissionSink`]
//!   receives them.
//!
//! Besides views, a target can get a *meta* type holding the name of each
//! of its members as a string constant (see [`MetaRequest`]).
//!
//! The `#[views]` attribute macro and the build-script [`Generator`] drive
//! the engine through the [`SourceUnit`] front-end.

mod access;
mod config;
mod diagnostics;
mod emit;
mod error;
mod extract;
mod filter;
mod generator;
mod model;
mod names;
mod render;
mod request;
mod resolve;
mod source;
mod type_model;
mod types;

pub use access::Access;
pub use config::{CONFIG_FILE_NAME, ENV_PREFIX, EngineConfig};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use emit::{EmissionSink, FileSink, GENERATED_HEADER, MemorySink};
pub use error::{EmitError, ViewError};
pub use extract::{
    Converter, DirectExtractor, ExtractContext, Extractor, FunctionSig, StaticFunctionExtractor,
};
pub use filter::MemberFilter;
pub use generator::Generator;
pub use model::{Member, MemberKind, Property, TypeInfo};
pub use names::QualifiedName;
pub use render::{MemberNames, Renderer, RustRenderer};
pub use request::{
    ConfigBearer, ConverterSpec, MetaRequest, NewProperty, PropertyOverride, TypeSelector,
    ViewRequest,
};
pub use resolve::{
    Engine, GeneratedNames, ResolvedMeta, ResolvedView, RoundReport, TargetOutcome, TargetState,
    UnitKind,
};
pub use source::{SourceUnit, VIEW_META, VIEW_OF, VIEW_PROPERTY, strip_helper_attrs};
pub use type_model::{InMemoryTypeModel, TypeModel};
pub use types::TypeRef;
