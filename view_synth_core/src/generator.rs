//! Build-script entry point writing one file per generated view.
//!
//! ```no_run
//! // build.rs
//! use view_synth_core::{Generator, Severity};
//!
//! let out_dir = std::env::var("OUT_DIR").expect("cargo sets OUT_DIR");
//! let report = Generator::new(out_dir)
//!     .source("src/model.rs", "crate::model")
//!     .generate()
//!     .expect("views generated");
//! for warning in report.diagnostics.of(Severity::Warning) {
//!     println!("cargo:warning={}", warning.message);
//! }
//! println!("cargo:rerun-if-changed=src/model.rs");
//! ```
//!
//! Each view lands in `<OUT_DIR>/<module path joined by dots>.<View>.rs` and
//! is pulled into its module with `include!`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::config::EngineConfig;
use crate::emit::FileSink;
use crate::error::{EmitError, ViewError};
use crate::names::QualifiedName;
use crate::render::RustRenderer;
use crate::resolve::{Engine, GeneratedNames, RoundReport};
use crate::source::SourceUnit;

/// Configures and runs one generation round over a set of source files.
#[derive(Debug, Clone)]
pub struct Generator {
    out_dir: Utf8PathBuf,
    config: Option<EngineConfig>,
    config_dir: Option<Utf8PathBuf>,
    sources: Vec<(Utf8PathBuf, String)>,
}

impl Generator {
    /// Writes generated files into `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            config: None,
            config_dir: None,
            sources: Vec::new(),
        }
    }

    /// Uses `config` instead of loading `view_synth.toml`.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads `view_synth.toml` and `VIEW_SYNTH_*` variables relative to
    /// `dir`. Defaults to the current directory, which is the package root
    /// inside build scripts.
    #[must_use]
    pub fn config_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Adds the file at `path` whose items live in `module`, e.g.
    /// `crate::model`.
    #[must_use]
    pub fn source(mut self, path: impl Into<Utf8PathBuf>, module: impl Into<String>) -> Self {
        self.sources.push((path.into(), module.into()));
        self
    }

    /// Reads every source, runs one round and writes the views.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Io`] or [`ViewError::Parse`] when a source cannot
    /// be read, [`ViewError::Config`] when settings fail to load, and
    /// [`ViewError::Failed`] when the round recorded an ERROR.
    pub fn generate(self) -> Result<RoundReport, ViewError> {
        let config = match (self.config, &self.config_dir) {
            (Some(config), _) => config,
            (None, Some(dir)) => EngineConfig::load(dir)?,
            (None, None) => EngineConfig::load(Utf8Path::new("."))?,
        };

        let mut unit = SourceUnit::default();
        for (path, module) in &self.sources {
            unit.merge(read_source(path, module)?);
        }

        let engine = Engine::new(config.clone())?;
        let renderer = RustRenderer::from_config(&config)?;
        let mut sink = FileSink::create(&self.out_dir).map_err(|err| match err {
            EmitError::Io { path, source } => ViewError::Io { path, source },
            EmitError::Syntax(err) => ViewError::Parse {
                path: self.out_dir.clone(),
                message: err.to_string(),
            },
        })?;
        let report = engine.run(
            &unit.model,
            &unit.bearers,
            &mut GeneratedNames::default(),
            &renderer,
            &mut sink,
        );
        tracing::info!(
            views = sink.written().len(),
            out_dir = %self.out_dir,
            "view generation finished"
        );
        report.into_result()
    }
}

fn read_source(path: &Utf8Path, module: &str) -> Result<SourceUnit, ViewError> {
    let io_error = |source| ViewError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| ViewError::Parse {
        path: path.to_path_buf(),
        message: String::from("expected a file path"),
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
    let text = dir.read_to_string(file_name).map_err(io_error)?;

    let parse_error = |message: String| ViewError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let file = syn::parse_file(&text).map_err(|err| parse_error(err.to_string()))?;
    let scope = module_scope(module)?;
    SourceUnit::from_file(&scope, &file).map_err(|err| {
        parse_error(
            err.into_iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        )
    })
}

fn module_scope(module: &str) -> Result<Vec<String>, ViewError> {
    let name = QualifiedName::parse(module)?;
    let mut scope = name.module().to_vec();
    scope.push(name.simple_name().to_owned());
    Ok(scope)
}
