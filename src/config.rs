//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/filtree/filtree.toml`
//! 3. Explicit config: `--config <path>`
//! 4. Environment variables: `FILTREE_*` prefix
//!
//! Every layer REPLACES the values it specifies, arrays included.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, IoResultExt};

/// Unified configuration for filtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Attributes offered by the filter builder; the first is preset on new rows
    pub attributes: Vec<String>,
    /// Attributes offered by the managed attribute builder
    pub managed_attributes: Vec<String>,
    /// Prompt shown by the interactive session
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            attributes: vec!["name".into(), "description".into()],
            managed_attributes: vec!["collector".into(), "locality".into(), "remarks".into()],
            prompt: "filtree> ".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub attributes: Option<Vec<String>>,
    pub managed_attributes: Option<Vec<String>>,
    pub prompt: Option<String>,
}

/// Get the XDG config directory for filtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "filtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("filtree.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path given on the command line.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay a raw layer onto self: specified values win.
    fn apply(&self, overlay: &RawSettings) -> Self {
        Self {
            attributes: overlay
                .attributes
                .clone()
                .unwrap_or_else(|| self.attributes.clone()),
            managed_attributes: overlay
                .managed_attributes
                .clone()
                .unwrap_or_else(|| self.managed_attributes.clone()),
            prompt: overlay.prompt.clone().unwrap_or_else(|| self.prompt.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        Self::load_from(global.as_deref(), explicit)
    }

    /// Load settings from the given global and explicit files, then the environment.
    pub fn load_from(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            current = current.apply(&load_raw_settings(path)?);
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            let path = expand_path(path);
            current = current.apply(&load_raw_settings(&path)?);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply FILTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FILTREE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("attributes")
                    .with_list_parse_key("managed_attributes")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("attributes") {
            settings.attributes = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("managed_attributes") {
            settings.managed_attributes = val;
        }
        if let Ok(val) = config.get_string("prompt") {
            settings.prompt = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# filtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/filtree/filtree.toml
#   Explicit: filtree --config <path>
#   Env:      FILTREE_* environment variables, lists comma separated
#             e.g. FILTREE_ATTRIBUTES=name,description

# Attributes offered by the filter builder (the first one is preset on new rows)
# attributes = ["name", "description"]

# Attributes offered by the managed attribute builder
# managed_attributes = ["collector", "locality", "remarks"]

# Prompt of the interactive session
# prompt = "filtree> "
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).expect("load defaults");
        assert!(!settings.attributes.is_empty());
        assert!(!settings.prompt.is_empty());
    }

    #[test]
    fn given_partial_overlay_when_applied_then_only_specified_values_replace() {
        let overlay = RawSettings {
            attributes: Some(vec!["title".into()]),
            ..RawSettings::default()
        };
        let settings = Settings::default().apply(&overlay);
        assert_eq!(settings.attributes, vec!["title".to_string()]);
        assert_eq!(
            settings.managed_attributes,
            Settings::default().managed_attributes
        );
        assert_eq!(settings.prompt, "filtree> ");
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.attributes.is_none());
    }

    #[test]
    fn given_settings_when_serialized_then_round_trips_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
