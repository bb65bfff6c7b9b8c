//! Configuration file discovery and loading

use super::zen_config::ZenConfig;
use crate::Result;
use crate::error::ZenError;
use std::path::{Path, PathBuf};

/// File names searched in each directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".zenrc.json",
    ".zenrc.toml",
    "zen.yaml",
    "zen.yml",
    "zen.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Checks [`CONFIG_FILE_NAMES`] in every directory from `start_path` up to
    /// the filesystem root and returns the first match.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| ZenError::ConfigError {
                message: format!("Invalid path: {e}"),
            })?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<ZenConfig> {
        ZenConfig::load(path).map_err(|e| match e {
            ZenError::ConfigError { message } => ZenError::ConfigError {
                message: format!("Failed to load config from '{}': {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Load config from path or auto-discover
    ///
    /// A custom path must exist. Without one, discovery starts at `start_dir`
    /// (or the current directory); finding nothing yields the defaults.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<ZenConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(ZenError::ConfigError {
                    message: format!(
                        "Config file not found: {}. Run 'zen config init' to create one.",
                        path.display()
                    ),
                });
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(ZenConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "zen.json",
            r#"{
                "defaultProfile": "xhtml",
                "maxNodes": 200
            }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("xhtml"));
        assert_eq!(config.max_nodes, Some(200));
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src/nested");
        fs::create_dir_all(&nested).unwrap();

        create_temp_config(temp_dir.path(), "zen.json", r#"{"maxNodes": 10}"#);

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(
            found.map(|p| p.file_name().unwrap().to_owned()),
            Some("zen.json".into())
        );
    }

    #[test]
    fn test_discovery_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "zen.json", r#"{"maxNodes": 1}"#);
        create_temp_config(temp_dir.path(), ".zenrc.toml", "maxNodes = 2\n");

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config.max_nodes, Some(2));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.json")), None);
        assert!(matches!(result, Err(ZenError::ConfigError { .. })));
    }

    #[test]
    fn test_malformed_file_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "zen.json", "{ not json");
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("zen.json"));
    }
}
