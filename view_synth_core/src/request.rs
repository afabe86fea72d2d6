//! Structured configuration requests consumed by the engine.
//!
//! Requests are produced by a front-end (the source adapter in
//! [`crate::source`], or hand-built in tests) and are read-only afterwards.

use crate::access::Access;
use crate::extract::FunctionSig;
use crate::names::QualifiedName;
use crate::types::TypeRef;

/// Names a type in a request, or refers back to the type carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeSelector {
    /// The configuration-bearing type itself.
    #[default]
    SelfType,
    /// An explicitly named type.
    Named(QualifiedName),
}

impl TypeSelector {
    /// Resolves the selector for a request carried by `bearer`.
    #[must_use]
    pub fn resolve(&self, bearer: &QualifiedName) -> QualifiedName {
        match self {
            Self::SelfType => bearer.clone(),
            Self::Named(name) => name.clone(),
        }
    }
}

impl From<QualifiedName> for TypeSelector {
    fn from(name: QualifiedName) -> Self {
        Self::Named(name)
    }
}

/// One request to generate a view.
///
/// Defaults follow the declarative form: the bearer is both target and
/// config, everything is public except setters, nothing is included, and the
/// error-reporting member is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    /// Type being viewed.
    pub target: TypeSelector,
    /// Type whose property customisations apply.
    pub config: TypeSelector,
    /// Module of the generated type; defaults to the target's module.
    pub gen_module: Option<Vec<String>>,
    /// Simple name of the generated type; defaults to target name + suffix.
    pub gen_name: Option<String>,
    /// Visibility of the generated type.
    pub type_access: Access,
    /// Visibility of `empty()`.
    pub empty_ctor: Access,
    /// Visibility of `new(fields...)`.
    pub fields_ctor: Access,
    /// Visibility of `from_source(&Target)`.
    pub copy_ctor: Access,
    /// Default getter visibility.
    pub getters: Access,
    /// Default setter visibility.
    pub setters: Access,
    /// Member names to include.
    pub includes: Vec<String>,
    /// Member names to exclude.
    pub excludes: Vec<String>,
    /// Regular expression selecting members to include.
    pub include_pattern: Option<String>,
    /// Regular expression selecting members to exclude.
    pub exclude_pattern: Option<String>,
    /// Whether to emit the `view_errors()` member.
    pub error_methods: bool,
}

impl Default for ViewRequest {
    fn default() -> Self {
        Self {
            target: TypeSelector::SelfType,
            config: TypeSelector::SelfType,
            gen_module: None,
            gen_name: None,
            type_access: Access::Public,
            empty_ctor: Access::Public,
            fields_ctor: Access::Public,
            copy_ctor: Access::Public,
            getters: Access::Public,
            setters: Access::None,
            includes: Vec::new(),
            excludes: Vec::new(),
            include_pattern: None,
            exclude_pattern: None,
            error_methods: true,
        }
    }
}

impl ViewRequest {
    /// A default request viewing `target`.
    #[must_use]
    pub fn of(target: QualifiedName) -> Self {
        Self {
            target: TypeSelector::Named(target),
            ..Self::default()
        }
    }

    /// Adds exact member names to include.
    #[must_use]
    pub fn including<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds exact member names to exclude.
    #[must_use]
    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Resolved target for a request carried by `bearer`.
    #[must_use]
    pub fn resolved_target(&self, bearer: &QualifiedName) -> QualifiedName {
        self.target.resolve(bearer)
    }

    /// Resolved config type for a request carried by `bearer`.
    #[must_use]
    pub fn resolved_config(&self, bearer: &QualifiedName) -> QualifiedName {
        self.config.resolve(bearer)
    }

    /// Qualified name of the generated type.
    #[must_use]
    pub fn generated_name(&self, bearer: &QualifiedName, suffix: &str) -> QualifiedName {
        let target = self.resolved_target(bearer);
        let name = self
            .gen_name
            .clone()
            .unwrap_or_else(|| format!("{}{suffix}", target.simple_name()));
        let module = self
            .gen_module
            .clone()
            .unwrap_or_else(|| target.module().to_vec());
        QualifiedName::new(module, name)
    }
}

/// Converter named by a property override, not yet bound to an input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSpec {
    /// Path to a type implementing `PropertyConverter`.
    pub path: syn::Path,
    /// Explicit output type; defaults to the trait's associated type.
    pub output: Option<TypeRef>,
}

/// Adjusts a property that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyOverride {
    /// Property being adjusted (the source member's name).
    pub name: String,
    /// New property name.
    pub rename: Option<String>,
    /// Getter visibility.
    pub getter: Option<Access>,
    /// Setter visibility.
    pub setter: Option<Access>,
    /// Conversion applied after extraction.
    pub converter: Option<ConverterSpec>,
    /// Generated view the value is projected into.
    pub view: Option<QualifiedName>,
    /// Function computing the value instead of a direct read.
    pub extractor: Option<FunctionSig>,
    /// Replacement documentation.
    pub comment: Option<String>,
}

impl PropertyOverride {
    /// An override that changes nothing yet.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Adds a function-backed property to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProperty {
    /// Property name.
    pub name: String,
    /// Function computing the value.
    pub function: FunctionSig,
    /// Getter visibility; defaults to the request's.
    pub getter: Option<Access>,
    /// Requested setter visibility; anything but NONE is rejected.
    pub setter: Option<Access>,
}

/// One request to generate a meta type: a unit struct holding the name of
/// every member of the target as a string constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaRequest {
    /// Type whose members are listed.
    pub target: TypeSelector,
    /// Module of the generated type; defaults to the target's module.
    pub gen_module: Option<Vec<String>>,
    /// Simple name of the generated type; defaults to target name + suffix.
    pub gen_name: Option<String>,
    /// Visibility of the generated type.
    pub type_access: Access,
}

impl Default for MetaRequest {
    fn default() -> Self {
        Self {
            target: TypeSelector::SelfType,
            gen_module: None,
            gen_name: None,
            type_access: Access::Public,
        }
    }
}

impl MetaRequest {
    /// A default request listing the members of `target`.
    #[must_use]
    pub fn of(target: QualifiedName) -> Self {
        Self {
            target: TypeSelector::Named(target),
            ..Self::default()
        }
    }

    /// Resolved target for a request carried by `bearer`.
    #[must_use]
    pub fn resolved_target(&self, bearer: &QualifiedName) -> QualifiedName {
        self.target.resolve(bearer)
    }

    /// Qualified name of the generated type.
    #[must_use]
    pub fn generated_name(&self, bearer: &QualifiedName, suffix: &str) -> QualifiedName {
        let target = self.resolved_target(bearer);
        let name = self
            .gen_name
            .clone()
            .unwrap_or_else(|| format!("{}{suffix}", target.simple_name()));
        let module = self
            .gen_module
            .clone()
            .unwrap_or_else(|| target.module().to_vec());
        QualifiedName::new(module, name)
    }
}

/// A type carrying view requests and/or property customisations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBearer {
    /// Qualified name of the bearing type.
    pub name: QualifiedName,
    /// Requests in declaration order.
    pub requests: Vec<ViewRequest>,
    /// Overrides applying to views configured by this type.
    pub overrides: Vec<PropertyOverride>,
    /// Function-backed properties added to views configured by this type.
    pub new_properties: Vec<NewProperty>,
    /// Meta type requests in declaration order.
    pub metas: Vec<MetaRequest>,
}

impl ConfigBearer {
    /// A bearer without requests or customisations.
    #[must_use]
    pub const fn new(name: QualifiedName) -> Self {
        Self {
            name,
            requests: Vec::new(),
            overrides: Vec::new(),
            new_properties: Vec::new(),
            metas: Vec::new(),
        }
    }

    /// Appends a request.
    #[must_use]
    pub fn with_request(mut self, request: ViewRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Appends a property override.
    #[must_use]
    pub fn with_override(mut self, property: PropertyOverride) -> Self {
        self.overrides.push(property);
        self
    }

    /// Appends a function-backed property.
    #[must_use]
    pub fn with_new_property(mut self, property: NewProperty) -> Self {
        self.new_properties.push(property);
        self
    }

    /// Appends a meta type request.
    #[must_use]
    pub fn with_meta(mut self, meta: MetaRequest) -> Self {
        self.metas.push(meta);
        self
    }

    /// Returns `true` when any meta request of this bearer lists `target`.
    #[must_use]
    pub fn describes(&self, target: &QualifiedName) -> bool {
        self.metas
            .iter()
            .any(|meta| &meta.resolved_target(&self.name) == target)
    }

    /// Returns `true` when any request of this bearer views `target`.
    #[must_use]
    pub fn targets(&self, target: &QualifiedName) -> bool {
        self.requests
            .iter()
            .any(|request| &request.resolved_target(&self.name) == target)
    }
}
