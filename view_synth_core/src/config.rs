//! Engine settings and their layered loading.
//!
//! Settings are gathered with `figment` from, in increasing precedence, the
//! built-in defaults, an optional `view_synth.toml` and `VIEW_SYNTH_*`
//! environment variables.

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// Default configuration file name looked up by [`EngineConfig::load`].
pub const CONFIG_FILE_NAME: &str = "view_synth.toml";

/// Prefix of environment variables overriding file settings.
pub const ENV_PREFIX: &str = "VIEW_SYNTH_";

/// Settings shared by every request of a round.
///
/// # Examples
///
/// ```
/// use view_synth_core::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.view_suffix, "View");
/// assert_eq!(config.meta_suffix, "Meta");
/// assert_eq!(config.runtime_crate, "::view_synth");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Appended to the target name when a request sets no `gen_name`.
    pub view_suffix: String,
    /// Appended to the target name when a meta request sets no `gen_name`.
    pub meta_suffix: String,
    /// Path of the runtime crate generated code refers to.
    pub runtime_crate: String,
    /// Traits derived on every generated view.
    pub derives: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view_suffix: String::from("View"),
            meta_suffix: String::from("Meta"),
            runtime_crate: String::from("::view_synth"),
            derives: vec![String::from("Debug"), String::from("Clone")],
        }
    }
}

impl EngineConfig {
    /// Loads settings from `dir/view_synth.toml` and the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Config`] when a layer fails to parse or holds a
    /// value of the wrong type.
    pub fn load(dir: &Utf8Path) -> Result<Self, ViewError> {
        Self::figment(dir).extract().map_err(ViewError::from)
    }

    /// The layered provider stack used by [`EngineConfig::load`].
    #[must_use]
    pub fn figment(dir: &Utf8Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join(CONFIG_FILE_NAME).as_std_path()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Parses [`EngineConfig::runtime_crate`] as a path.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidName`] when the setting is not a path.
    pub fn runtime_path(&self) -> Result<syn::Path, ViewError> {
        syn::parse_str(&self.runtime_crate)
            .map_err(|_| ViewError::InvalidName(self.runtime_crate.clone()))
    }

    /// Parses [`EngineConfig::derives`] as paths.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidName`] for an entry that is not a path.
    pub fn derive_paths(&self) -> Result<Vec<syn::Path>, ViewError> {
        self.derives
            .iter()
            .map(|derive| {
                syn::parse_str(derive).map_err(|_| ViewError::InvalidName(derive.clone()))
            })
            .collect()
    }
}
