//! Engine configuration file
//!
//! ## Example Configuration (.zenrc.toml)
//!
//! ```toml
//! defaultProfile = "xhtml"
//! profilesDir = "./profiles"
//! maxNodes = 5000
//! maxDepth = 64
//! rangeReplace = "first"
//! ```
//!
//! Every key is optional; absent keys take the [`EngineOptions`] defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::caret::RangeReplace;
use crate::engine::EngineOptions;
use crate::error::ZenError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZenConfig {
    /// Profile new sessions start with (default `html`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    /// Profile substituted for unknown names (default `xhtml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_profile: Option<String>,

    /// Fail on unknown profile names instead of falling back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_profiles: Option<bool>,

    /// Directory of custom profile files, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,

    /// Ceiling on expanded node count (default 10000)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,

    /// Ceiling on element and group nesting (default 256)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_replace: Option<RangeReplace>,

    /// Force caret placeholders on or off for every profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_caret: Option<bool>,
}

impl ZenConfig {
    /// Load configuration from file
    ///
    /// The format follows the extension: `.toml`, `.yaml`/`.yml` or `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ZenError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let mut config: ZenConfig = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| ZenError::config_error(e.to_string()))?,
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| ZenError::config_error(e.to_string()))?
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ZenError::config_error(e.to_string()))?
            }
            _ => {
                return Err(ZenError::config_error(
                    "Unsupported file extension (expected .toml, .yaml, .yml, or .json)",
                ));
            }
        };

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Make `profilesDir` absolute against `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(dir) = &self.profiles_dir
            && dir.is_relative()
        {
            self.profiles_dir = Some(base.join(dir));
        }
    }

    /// Check values that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.max_nodes == Some(0) {
            return Err(ZenError::config_error("maxNodes must be greater than zero"));
        }
        if self.max_depth == Some(0) {
            return Err(ZenError::config_error("maxDepth must be greater than zero"));
        }
        for (key, value) in [
            ("defaultProfile", &self.default_profile),
            ("fallbackProfile", &self.fallback_profile),
        ] {
            if let Some(name) = value
                && name.trim().is_empty()
            {
                return Err(ZenError::config_error(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }

    /// Resolve into the options an engine runs with
    pub fn engine_options(&self) -> EngineOptions {
        let defaults = EngineOptions::default();
        let fallback_profile = if self.strict_profiles.unwrap_or(false) {
            None
        } else {
            self.fallback_profile.clone().or(defaults.fallback_profile)
        };

        EngineOptions {
            default_profile: self
                .default_profile
                .clone()
                .unwrap_or(defaults.default_profile),
            fallback_profile,
            max_nodes: self.max_nodes.unwrap_or(defaults.max_nodes),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            range_replace: self.range_replace.unwrap_or(defaults.range_replace),
            place_caret: self.place_caret.or(defaults.place_caret),
        }
    }

    /// Configuration written by `zen config init`
    pub fn starter() -> Self {
        Self {
            default_profile: Some("html".to_string()),
            fallback_profile: Some("xhtml".to_string()),
            strict_profiles: Some(false),
            profiles_dir: None,
            max_nodes: Some(crate::builder::DEFAULT_MAX_NODES),
            max_depth: Some(crate::builder::DEFAULT_MAX_DEPTH),
            range_replace: Some(RangeReplace::All),
            place_caret: None,
        }
    }
}
