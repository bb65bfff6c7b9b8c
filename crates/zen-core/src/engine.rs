//! Expansion engine and per-caller sessions
//!
//! [`Engine`] owns the profile registry and the resolved options and exposes
//! the expand, wrap and profile-management calls. It holds no per-call state,
//! so one engine can serve any number of [`Session`]s concurrently; a session
//! only adds the name of its active profile.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;
use crate::builder::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Limits, parse};
use crate::caret::{CARET_PLACEHOLDER, RangeReplace, resolve_caret_with};
use crate::config::ZenConfig;
use crate::error::ZenError;
use crate::extract::extract_abbreviation;
use crate::profile::{Profile, ProfileRegistry};
use crate::render::render;
use crate::wrap::wrap_with_limits;

/// Final text and caret position of an expand or wrap call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    pub text: String,
    /// Byte offset into `text`; `None` means "after the inserted text"
    pub caret: Option<usize>,
}

/// Result of expanding the abbreviation in front of the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansion {
    /// The recognized abbreviation
    pub abbreviation: String,
    /// Byte offset of the abbreviation in the line
    pub start: usize,
    pub text: String,
    pub caret: Option<usize>,
}

/// Resolved engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Profile new sessions start with
    pub default_profile: String,
    /// Profile used for unknown names; `None` makes unknown names an error
    pub fallback_profile: Option<String>,
    /// Ceiling on expanded node count
    pub max_nodes: usize,
    /// Ceiling on element and group nesting
    pub max_depth: usize,
    pub range_replace: RangeReplace,
    /// Overrides every profile's `place_cursor` when set
    pub place_caret: Option<bool>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_profile: "html".to_string(),
            fallback_profile: Some("xhtml".to_string()),
            max_nodes: DEFAULT_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
            range_replace: RangeReplace::All,
            place_caret: None,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    profiles: ProfileRegistry,
    options: EngineOptions,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            profiles: ProfileRegistry::with_fallback(options.fallback_profile.clone()),
            options,
        }
    }

    /// Build an engine from configuration, loading its profile directory
    pub fn from_config(config: &ZenConfig) -> Result<Self> {
        let engine = Self::with_options(config.engine_options());

        if let Some(dir) = &config.profiles_dir {
            engine.load_custom_profiles(dir)?;
        }

        let default = &engine.options.default_profile;
        if !engine.profiles.contains(default) {
            match &engine.options.fallback_profile {
                Some(fallback) => warn!(
                    "Default profile '{}' is not defined, '{}' will be used",
                    default, fallback
                ),
                None => {
                    return Err(ZenError::profile_error(
                        default,
                        "default profile is not defined",
                    ));
                }
            }
        }

        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    fn limits(&self) -> Limits {
        Limits {
            max_nodes: self.options.max_nodes,
            max_depth: self.options.max_depth,
        }
    }

    /// Resolve a profile by name, applying the caret override
    pub fn profile(&self, name: &str) -> Result<Arc<Profile>> {
        let profile = self.profiles.resolve(name)?;
        match self.options.place_caret {
            Some(place) if place != profile.place_cursor => Ok(Arc::new(Profile {
                place_cursor: place,
                ..(*profile).clone()
            })),
            _ => Ok(profile),
        }
    }

    /// Expand a complete abbreviation
    pub fn expand_abbreviation(&self, abbreviation: &str, profile: &str) -> Result<RenderResult> {
        let profile = self.profile(profile)?;
        let tree = parse(abbreviation, self.limits())?;
        let rendered = render(&tree, &profile);
        debug!(
            abbreviation,
            profile = %profile.name,
            bytes = rendered.len(),
            "Rendered abbreviation"
        );
        Ok(self.finish(&rendered))
    }

    /// Expand the abbreviation that ends at `cursor` in `line`
    ///
    /// `cursor` is a byte offset. Returns `Ok(None)` when no abbreviation
    /// precedes it.
    pub fn expand(&self, line: &str, cursor: usize, profile: &str) -> Result<Option<Expansion>> {
        if cursor > line.len() || !line.is_char_boundary(cursor) {
            return Err(ZenError::InvalidCursor {
                cursor,
                len: line.len(),
            });
        }

        let Some((start, abbreviation)) = extract_abbreviation(&line[..cursor]) else {
            debug!(cursor, "No abbreviation before cursor");
            return Ok(None);
        };

        let result = self.expand_abbreviation(abbreviation, profile)?;
        Ok(Some(Expansion {
            abbreviation: abbreviation.to_string(),
            start,
            text: result.text,
            caret: result.caret,
        }))
    }

    /// Wrap `selected` with the expansion of `abbreviation`
    pub fn wrap(&self, abbreviation: &str, selected: &str, profile: &str) -> Result<RenderResult> {
        let profile = self.profile(profile)?;
        let rendered = wrap_with_limits(abbreviation, selected, &profile, self.limits())?;
        Ok(self.finish(&rendered))
    }

    fn finish(&self, rendered: &str) -> RenderResult {
        let (text, caret) =
            resolve_caret_with(rendered, CARET_PLACEHOLDER, self.options.range_replace);
        RenderResult { text, caret }
    }

    pub fn list_profiles(&self) -> Vec<String> {
        self.profiles.list()
    }

    /// Add the profiles found in `dir`; returns how many were loaded
    pub fn load_custom_profiles(&self, dir: &Path) -> Result<usize> {
        self.profiles.load_custom_profiles(dir)
    }

    /// Drop all custom profiles and load `dir` in one swap
    pub fn reload_profiles(&self, dir: &Path) -> Result<usize> {
        self.profiles.reload(dir)
    }
}

/// A caller's view of a shared engine
#[derive(Debug, Clone)]
pub struct Session {
    engine: Arc<Engine>,
    active_profile: String,
}

impl Session {
    /// Start a session on the engine's default profile
    pub fn new(engine: Arc<Engine>) -> Self {
        let active_profile = engine.options.default_profile.clone();
        Self {
            engine,
            active_profile,
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn active_profile(&self) -> &str {
        &self.active_profile
    }

    /// Switch profiles for subsequent calls; unknown names are rejected
    pub fn set_active_profile(&mut self, name: &str) -> Result<()> {
        if !self.engine.profiles.contains(name) {
            return Err(ZenError::profile_error(name, "unknown profile"));
        }
        debug!(from = %self.active_profile, to = name, "Switching profile");
        self.active_profile = name.to_string();
        Ok(())
    }

    pub fn expand(&self, line: &str, cursor: usize) -> Result<Option<Expansion>> {
        self.engine.expand(line, cursor, &self.active_profile)
    }

    pub fn expand_abbreviation(&self, abbreviation: &str) -> Result<RenderResult> {
        self.engine
            .expand_abbreviation(abbreviation, &self.active_profile)
    }

    pub fn wrap(&self, abbreviation: &str, selected: &str) -> Result<RenderResult> {
        self.engine.wrap(abbreviation, selected, &self.active_profile)
    }

    pub fn list_profiles(&self) -> Vec<String> {
        self.engine.list_profiles()
    }
}

/// Active profile name, falling back to the engine default for empty input
pub fn profile_or_default<'a>(engine: &'a Engine, name: Option<&'a str>) -> &'a str {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => &engine.options.default_profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_abbreviation_resolves_caret() {
        let engine = Engine::new();
        let result = engine.expand_abbreviation("div#main.a.b", "html").unwrap();
        assert_eq!(result.text, r#"<div id="main" class="a b"></div>"#);
        assert_eq!(result.caret, Some(27));
    }

    #[test]
    fn test_expand_reports_start() {
        let engine = Engine::new();
        let expansion = engine.expand("  <p>a.x", 8, "html").unwrap().unwrap();
        assert_eq!(expansion.abbreviation, "a.x");
        assert_eq!(expansion.start, 5);
        assert_eq!(expansion.text, r#"<a class="x"></a>"#);
    }

    #[test]
    fn test_expand_cursor_in_middle() {
        let engine = Engine::new();
        let expansion = engine.expand("b rest", 1, "html").unwrap().unwrap();
        assert_eq!(expansion.abbreviation, "b");
        assert_eq!(expansion.text, "<b></b>");
    }

    #[test]
    fn test_no_abbreviation() {
        let engine = Engine::new();
        assert_eq!(engine.expand("text ", 5, "html").unwrap(), None);
    }

    #[test]
    fn test_invalid_cursor() {
        let engine = Engine::new();
        assert!(matches!(
            engine.expand("abc", 4, "html"),
            Err(ZenError::InvalidCursor { cursor: 4, len: 3 })
        ));
        assert!(matches!(
            engine.expand("é", 1, "html"),
            Err(ZenError::InvalidCursor { .. })
        ));
    }

    #[test]
    fn test_place_caret_override() {
        let engine = Engine::with_options(EngineOptions {
            place_caret: Some(false),
            ..EngineOptions::default()
        });
        let result = engine.expand_abbreviation("a[href]", "html").unwrap();
        assert_eq!(result.text, r#"<a href=""></a>"#);
        assert_eq!(result.caret, None);
    }

    #[test]
    fn test_strict_engine_rejects_unknown_profile() {
        let engine = Engine::with_options(EngineOptions {
            fallback_profile: None,
            ..EngineOptions::default()
        });
        assert!(matches!(
            engine.expand_abbreviation("p", "missing"),
            Err(ZenError::Profile { .. })
        ));
    }

    #[test]
    fn test_session_profile_switch() {
        let engine = Arc::new(Engine::new());
        let mut session = Session::new(Arc::clone(&engine));
        assert_eq!(session.active_profile(), "html");
        assert_eq!(session.expand_abbreviation("br").unwrap().text, "<br>");

        session.set_active_profile("xhtml").unwrap();
        assert_eq!(session.expand_abbreviation("br").unwrap().text, "<br />");

        assert!(session.set_active_profile("nope").is_err());
        assert_eq!(session.active_profile(), "xhtml");
    }

    #[test]
    fn test_profile_or_default() {
        let engine = Engine::new();
        assert_eq!(profile_or_default(&engine, None), "html");
        assert_eq!(profile_or_default(&engine, Some(" ")), "html");
        assert_eq!(profile_or_default(&engine, Some("xml")), "xml");
    }
}
