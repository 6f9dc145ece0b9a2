//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/domscope/domscope.toml`
//! 3. Local config: `./.domscope.toml` or the file given with `--config`
//! 4. Environment variables: `DOMSCOPE_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, TextScope, DEFAULT_BLOCK_TAGS};

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".domscope.toml";

/// Unified configuration for domscope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tags whose text is grouped by `blocks` and `report`
    pub block_tags: Vec<String>,
    /// Whether outer blocks repeat the text of nested blocks
    pub text_scope: TextScope,
    /// Default destination of `export`
    pub export_file: PathBuf,
    /// Default destination of `report`
    pub report_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_tags: DEFAULT_BLOCK_TAGS.iter().map(|t| t.to_string()).collect(),
            text_scope: TextScope::default(),
            export_file: PathBuf::from("output.json"),
            report_file: PathBuf::from("domscope_report.txt"),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub block_tags: Option<Vec<String>>,
    pub text_scope: Option<TextScope>,
    pub export_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
}

/// Get the XDG config directory for domscope.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "domscope").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("domscope.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are appended to base when not already present
    /// - Items prefixed with `!` remove the corresponding item from the result
    ///
    /// Base order is kept, so configured tag order stays stable.
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["div", "p"], &["li"])        // → ["div", "p", "li"]
    /// merge_array(&["div", "p"], &["!div", "li"]) // → ["p", "li"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let removed: HashSet<&str> = overlay
            .iter()
            .filter_map(|item| item.strip_prefix('!'))
            .collect();

        let mut result: Vec<String> = Vec::new();
        for item in base.iter().chain(overlay.iter().filter(|i| !i.starts_with('!'))) {
            if !removed.contains(item.as_str()) && !result.contains(item) {
                result.push(item.clone());
            }
        }
        result
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.export_file = PathBuf::from(expand_env_vars(&self.export_file.to_string_lossy()));
        self.report_file = PathBuf::from(expand_env_vars(&self.report_file.to_string_lossy()));
    }

    /// Apply global config onto defaults: every specified field REPLACES.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            block_tags: global
                .block_tags
                .clone()
                .unwrap_or_else(|| self.block_tags.clone()),
            text_scope: global.text_scope.unwrap_or(self.text_scope),
            export_file: global
                .export_file
                .clone()
                .unwrap_or_else(|| self.export_file.clone()),
            report_file: global
                .report_file
                .clone()
                .unwrap_or_else(|| self.report_file.clone()),
        }
    }

    /// Merge local config onto self with union semantics for `block_tags`.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            block_tags: overlay
                .block_tags
                .as_ref()
                .map(|o| Self::merge_array(&self.block_tags, o))
                .unwrap_or_else(|| self.block_tags.clone()),
            ..self.apply_global(&RawSettings {
                block_tags: None,
                ..overlay.clone()
            })
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional local config file; falls back to `./.domscope.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with `!tag` negation
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        current = current.with_local(local_config)?;
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Merge a local config file onto these settings.
    ///
    /// An explicitly given file must exist; the implicit `./.domscope.toml` is optional.
    pub fn with_local(self, local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let local_path = match local_config {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(LOCAL_CONFIG_FILE),
        };

        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            return Ok(self.merge_with(&raw));
        }
        Ok(self)
    }

    /// Apply DOMSCOPE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DOMSCOPE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("block_tags"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("block_tags") {
            settings.block_tags = val;
        }
        if let Ok(val) = config.get_string("text_scope") {
            settings.text_scope = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("DOMSCOPE_TEXT_SCOPE: {}", e),
            })?;
        }
        if let Ok(val) = config.get_string("export_file") {
            settings.export_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("report_file") {
            settings.report_file = PathBuf::from(val);
        }

        Ok(settings)
    }

    /// Render the settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
