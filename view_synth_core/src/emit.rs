//! Sinks receiving rendered views.
//!
//! A sink receives one complete unit per view. [`FileSink`] writes each unit
//! to a temporary file and renames it into place, so an interrupted write
//! never leaves a truncated file behind.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use proc_macro2::TokenStream;

use crate::error::EmitError;
use crate::names::QualifiedName;

/// Header written at the top of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by view_synth. Do not edit by hand.\n\n";

/// Destination for rendered views.
pub trait EmissionSink {
    /// Emits the complete token stream of the view `name`.
    ///
    /// # Errors
    ///
    /// Returns an [`EmitError`] when the unit could not be written; nothing
    /// of it must remain visible in that case.
    fn emit(&mut self, name: &QualifiedName, tokens: TokenStream) -> Result<(), EmitError>;
}

/// Keeps emitted units in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Vec<(QualifiedName, TokenStream)>,
}

impl MemorySink {
    /// Emitted units in order.
    #[must_use]
    pub fn units(&self) -> &[(QualifiedName, TokenStream)] {
        &self.units
    }

    /// Tokens emitted for `name`.
    #[must_use]
    pub fn get(&self, name: &QualifiedName) -> Option<&TokenStream> {
        self.units
            .iter()
            .find(|(emitted, _)| emitted == name)
            .map(|(_, tokens)| tokens)
    }

    /// Concatenation of every emitted unit.
    #[must_use]
    pub fn into_tokens(self) -> TokenStream {
        self.units.into_iter().map(|(_, tokens)| tokens).collect()
    }
}

impl EmissionSink for MemorySink {
    fn emit(&mut self, name: &QualifiedName, tokens: TokenStream) -> Result<(), EmitError> {
        self.units.push((name.clone(), tokens));
        Ok(())
    }
}

/// Writes one formatted `.rs` file per view into a directory.
///
/// Files are named after the generated type's qualified name with `::`
/// replaced by `.`, e.g. `crate.model.PersonView.rs`.
#[derive(Debug)]
pub struct FileSink {
    root: Utf8PathBuf,
    dir: Dir,
    written: Vec<Utf8PathBuf>,
}

impl FileSink {
    /// Opens `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Io`] when the directory cannot be created or
    /// opened.
    pub fn create(root: &Utf8Path) -> Result<Self, EmitError> {
        let dir = ensure_dir(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
            written: Vec::new(),
        })
    }

    /// File name used for the view `name`.
    #[must_use]
    pub fn file_name(name: &QualifiedName) -> String {
        format!("{}.rs", name.to_string().replace("::", "."))
    }

    /// Paths written so far, in order.
    #[must_use]
    pub fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }

    fn io_error(&self, file: &str, source: std::io::Error) -> EmitError {
        EmitError::Io {
            path: self.root.join(file),
            source,
        }
    }

    fn write_atomically(&self, file_name: &str, contents: &str) -> Result<(), EmitError> {
        let staging = format!(".{file_name}.tmp");
        let result = self
            .dir
            .open_with(
                &staging,
                OpenOptions::new().write(true).create(true).truncate(true),
            )
            .and_then(|mut file| {
                file.write_all(contents.as_bytes())?;
                file.flush()
            })
            .and_then(|()| self.dir.rename(&staging, &self.dir, file_name));
        if let Err(err) = result {
            if let Err(cleanup) = self.dir.remove_file(&staging) {
                tracing::debug!(file = %staging, error = %cleanup, "staging file not removed");
            }
            return Err(self.io_error(file_name, err));
        }
        Ok(())
    }
}

impl EmissionSink for FileSink {
    fn emit(&mut self, name: &QualifiedName, tokens: TokenStream) -> Result<(), EmitError> {
        let file: syn::File = syn::parse2(tokens)?;
        let contents = format!("{GENERATED_HEADER}{}", prettyplease::unparse(&file));
        let file_name = Self::file_name(name);
        self.write_atomically(&file_name, &contents)?;
        let path = self.root.join(&file_name);
        tracing::info!(view = %name, path = %path, "wrote generated view");
        self.written.push(path);
        Ok(())
    }
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, EmitError> {
    let io_error = |source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    };
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(io_error)?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(io_error)
        }
        Err(open_err) => Err(io_error(open_err)),
    }
}
