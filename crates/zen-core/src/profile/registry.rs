//! Profile registry
//!
//! Lookups read an immutable snapshot; registration builds a new table and
//! swaps it in, so readers never observe a half-loaded directory.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tracing::info;

use super::{BUILTIN_PROFILES, Profile, load_profiles_dir};
use crate::Result;
use crate::error::ZenError;

#[derive(Debug, Clone, Default)]
struct ProfileTable {
    profiles: IndexMap<String, Arc<Profile>>,
}

impl ProfileTable {
    fn builtins() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .filter_map(|name| Profile::builtin(name))
            .map(|profile| (profile.name.clone(), Arc::new(profile)))
            .collect();
        Self { profiles }
    }

    fn insert(&mut self, profile: Profile) {
        let name = profile.name.clone();
        if self.profiles.contains_key(&name) {
            info!("Profile '{}' replaced by a custom definition", name);
        }
        self.profiles.insert(name, Arc::new(profile));
    }
}

/// Named profiles: the built-ins plus any loaded custom ones
#[derive(Debug)]
pub struct ProfileRegistry {
    table: ArcSwap<ProfileTable>,
    fallback: Option<String>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistry {
    /// Registry with the built-in profiles, falling back to `xhtml`
    pub fn new() -> Self {
        Self::with_fallback(Some("xhtml".to_string()))
    }

    /// Registry with the built-in profiles and an explicit fallback
    ///
    /// With `None`, [`resolve`](Self::resolve) fails on unknown names.
    pub fn with_fallback(fallback: Option<String>) -> Self {
        Self {
            table: ArcSwap::from_pointee(ProfileTable::builtins()),
            fallback,
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Profile>> {
        self.table.load().profiles.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.load().profiles.contains_key(name)
    }

    /// Look up `name`, substituting the fallback profile when it is unknown
    pub fn resolve(&self, name: &str) -> Result<Arc<Profile>> {
        let table = self.table.load_full();
        if let Some(profile) = table.profiles.get(name) {
            return Ok(Arc::clone(profile));
        }

        if let Some(fallback) = &self.fallback
            && let Some(profile) = table.profiles.get(fallback)
        {
            tracing::debug!("Unknown profile '{}', using '{}'", name, fallback);
            return Ok(Arc::clone(profile));
        }

        Err(ZenError::profile_error(name, "unknown profile"))
    }

    /// Profile names: built-ins first, then custom profiles in load order
    pub fn list(&self) -> Vec<String> {
        self.table.load().profiles.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.table.load().profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add or replace a single profile
    pub fn register(&self, profile: Profile) {
        self.extend(std::iter::once(profile));
    }

    fn extend(&self, profiles: impl IntoIterator<Item = Profile>) {
        let profiles: Vec<Profile> = profiles.into_iter().collect();
        if profiles.is_empty() {
            return;
        }

        loop {
            let current = self.table.load_full();
            let mut next = (*current).clone();
            for profile in profiles.iter().cloned() {
                next.insert(profile);
            }

            let previous = self.table.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&previous, &current) {
                return;
            }
        }
    }

    /// Load every profile file in `dir` on top of the current table
    ///
    /// Returns the number of profiles loaded.
    pub fn load_custom_profiles(&self, dir: &Path) -> Result<usize> {
        let loaded = load_profiles_dir(dir)?;
        let count = loaded.len();
        self.extend(loaded.into_iter().map(|(_, profile)| profile));
        info!("Loaded {} custom profile(s) from {}", count, dir.display());
        Ok(count)
    }

    /// Replace all custom profiles with the contents of `dir`
    pub fn reload(&self, dir: &Path) -> Result<usize> {
        let loaded = load_profiles_dir(dir)?;
        let count = loaded.len();

        let mut table = ProfileTable::builtins();
        for (_, profile) in loaded {
            table.insert(profile);
        }
        self.table.store(Arc::new(table));

        info!("Reloaded profiles from {}: {} custom", dir.display(), count);
        Ok(count)
    }
}
