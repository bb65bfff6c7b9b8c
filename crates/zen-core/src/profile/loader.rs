//! Custom profile files
//!
//! A profile file holds a single `profile` section:
//!
//! ```toml
//! [profile]
//! name = "compact"
//! tag_case = "upper"
//! tag_nl = "decide"
//! self_closing_tag = "xhtml"
//! ```
//!
//! JSON and YAML files use the same shape under a `profile` key. Keys that
//! are left out take the `xhtml` defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Case, LineBreaks, Profile, QuoteStyle, SelfClosingStyle};
use crate::Result;
use crate::error::ZenError;

/// Top-level shape of a profile file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFile {
    pub profile: ProfileDefinition,
}

/// Profile keys as written in a file; everything but `name` is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_case: Option<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_case: Option<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_quotes: Option<QuoteStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_nl: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_cursor: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_break: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_closing_tag: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_self_closing: Option<Flag>,
}

/// A boolean that may also be spelled as a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Word(String),
}

impl Flag {
    fn as_bool(&self) -> Option<bool> {
        match self {
            Flag::Bool(value) => Some(*value),
            Flag::Word(word) => match word.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
        }
    }

    fn is_word(&self, expected: &str) -> bool {
        matches!(self, Flag::Word(word) if word.trim().eq_ignore_ascii_case(expected))
    }
}

impl ProfileDefinition {
    /// Resolve the definition against the `xhtml` defaults
    pub fn into_profile(self) -> Result<Profile> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ZenError::profile_error("", "profile name is empty"));
        }

        let invalid = |key: &str, flag: &Flag| {
            ZenError::profile_error(&name, format!("invalid value for '{key}': {flag:?}"))
        };
        let boolean = |key: &str, flag: Option<Flag>, default: bool| -> Result<bool> {
            match flag {
                None => Ok(default),
                Some(flag) => flag.as_bool().ok_or_else(|| invalid(key, &flag)),
            }
        };

        let defaults = Profile::xhtml();

        let tag_nl = match self.tag_nl {
            None => defaults.tag_nl,
            Some(flag) if flag.is_word("decide") => LineBreaks::Decide,
            Some(flag) => match flag.as_bool() {
                Some(true) => LineBreaks::Always,
                Some(false) => LineBreaks::Never,
                None => return Err(invalid("tag_nl", &flag)),
            },
        };

        let self_closing_tag = match self.self_closing_tag {
            None => defaults.self_closing_tag,
            Some(flag) if flag.is_word("xhtml") => SelfClosingStyle::Xhtml,
            Some(flag) => match flag.as_bool() {
                Some(true) => SelfClosingStyle::Xml,
                Some(false) => SelfClosingStyle::Html,
                None => return Err(invalid("self_closing_tag", &flag)),
            },
        };

        let place_cursor = boolean("place_cursor", self.place_cursor, defaults.place_cursor)?;
        let indent = boolean("indent", self.indent, defaults.indent)?;
        let force_self_closing = boolean(
            "force_self_closing",
            self.force_self_closing,
            defaults.force_self_closing,
        )?;

        Ok(Profile {
            tag_case: self.tag_case.unwrap_or(defaults.tag_case),
            attr_case: self.attr_case.unwrap_or(defaults.attr_case),
            attr_quotes: self.attr_quotes.unwrap_or(defaults.attr_quotes),
            tag_nl,
            place_cursor,
            indent,
            indentation: self.indent_string.unwrap_or(defaults.indentation),
            inline_break: self.inline_break.unwrap_or(defaults.inline_break),
            self_closing_tag,
            force_self_closing,
            name,
        })
    }
}

fn is_profile_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("toml" | "json" | "yaml" | "yml")
    )
}

/// Load a single profile file, choosing the format from its extension
pub fn load_profile_file(path: &Path) -> Result<Profile> {
    let label = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ZenError::io_error(path, e))?;

    let file: ProfileFile = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            toml::from_str(&content).map_err(|e| ZenError::profile_error(&label, e.to_string()))?
        }
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| ZenError::profile_error(&label, e.to_string()))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| ZenError::profile_error(&label, e.to_string()))?,
        _ => {
            return Err(ZenError::profile_error(
                &label,
                "unsupported file extension (expected .toml, .json, .yaml or .yml)",
            ));
        }
    };

    file.profile.into_profile()
}

/// Load every profile file directly inside `dir`
///
/// Files are visited in file-name order. A file that cannot be read or parsed
/// is logged and skipped; only an unreadable directory is an error.
pub fn load_profiles_dir(dir: &Path) -> Result<Vec<(PathBuf, Profile)>> {
    if !dir.is_dir() {
        return Err(ZenError::profile_error(
            dir.display().to_string(),
            "profile directory does not exist or is not a directory",
        ));
    }

    let mut profiles = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ZenError::profile_error(
                    dir.display().to_string(),
                    e.to_string(),
                ));
            }
            Err(e) => {
                warn!("Skipping unreadable profile entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_profile_file(path) {
            debug!("Ignoring {} in profile directory", path.display());
            continue;
        }

        match load_profile_file(path) {
            Ok(profile) => {
                debug!("Loaded profile '{}' from {}", profile.name, path.display());
                profiles.push((path.to_path_buf(), profile));
            }
            Err(e) => warn!("Skipping profile file {}: {}", path.display(), e),
        }
    }

    Ok(profiles)
}
