//! Command implementations

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use tracing::{debug, error};
use zen_core::engine::profile_or_default;
use zen_core::{ConfigLoader, Engine, ZenConfig};

use crate::output::OutputFormatter;
use crate::{ConfigFormat, OutputFormat};

/// Global options shared by all commands
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub profiles_dir: Option<PathBuf>,
    pub use_colors: bool,
}

impl Context {
    /// Configuration in effect: explicit file, discovered file or defaults
    fn config(&self) -> anyhow::Result<ZenConfig> {
        let mut config = ConfigLoader::load(self.config_path.as_deref(), None)?;
        if let Some(dir) = &self.profiles_dir {
            config.profiles_dir = Some(dir.clone());
        }
        Ok(config)
    }

    fn engine(&self) -> anyhow::Result<Engine> {
        let config = self.config()?;
        debug!("Building engine from {:?}", config);
        Ok(Engine::from_config(&config)?)
    }

    fn formatter(&self, format: OutputFormat) -> OutputFormatter {
        OutputFormatter::new(format, self.use_colors)
    }
}

/// Expand command implementation
pub fn expand_command(
    ctx: &Context,
    line: &str,
    cursor: Option<usize>,
    profile: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    let profile = profile_or_default(&engine, profile);
    let cursor = cursor.unwrap_or(line.len());
    debug!("Expanding at byte {} with profile '{}'", cursor, profile);

    match engine.expand(line, cursor, profile)? {
        Some(expansion) => ctx.formatter(format).print_expansion(&expansion),
        None => bail!("No abbreviation found before byte {cursor}"),
    }
}

/// Wrap command implementation
pub fn wrap_command(
    ctx: &Context,
    abbreviation: &str,
    file: Option<PathBuf>,
    profile: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let selected = match &file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read standard input")?;
            buffer
        }
    };

    let engine = ctx.engine()?;
    let profile = profile_or_default(&engine, profile);
    let result = engine.wrap(abbreviation, &selected, profile)?;
    ctx.formatter(format).print_render(&result)
}

/// Profiles list command implementation
pub fn profiles_list_command(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    ctx.formatter(format)
        .print_profiles(&engine.list_profiles(), &engine.options().default_profile)
}

/// Profiles show command implementation
pub fn profiles_show_command(ctx: &Context, name: &str, format: OutputFormat) -> anyhow::Result<()> {
    let engine = ctx.engine()?;
    let Some(profile) = engine.profiles().get(name) else {
        bail!(
            "Unknown profile '{}'. Available: {}",
            name,
            engine.list_profiles().join(", ")
        );
    };
    ctx.formatter(format).print_profile(&profile)
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> anyhow::Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".zenrc.json",
        ConfigFormat::Toml => ".zenrc.toml",
    };
    let config_path = Path::new(filename);

    if config_path.exists() && !force {
        bail!("Configuration file '{filename}' already exists. Use --force to overwrite.");
    }

    let config = ZenConfig::starter();
    let config_content = match format {
        ConfigFormat::Json => {
            serde_json::to_string_pretty(&config).context("Failed to serialize JSON")?
        }
        ConfigFormat::Toml => toml::to_string_pretty(&config).context("Failed to serialize TOML")?,
    };

    fs::write(config_path, config_content)
        .with_context(|| format!("Failed to write '{filename}'"))?;

    println!("Created configuration file: {filename}");
    println!("   Set profilesDir to load custom output profiles.");
    Ok(())
}

/// Config validate command implementation
pub fn config_validate_command(path: Option<PathBuf>) -> anyhow::Result<()> {
    debug!("Validating configuration file: {:?}", path);

    let config = match &path {
        Some(p) => ConfigLoader::load_from_file(p),
        None => ConfigLoader::load(None, None),
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            return Err(e.into());
        }
    };

    let engine = Engine::from_config(&config)?;
    let options = engine.options();
    println!("Configuration is valid");
    println!("   Default profile: {}", options.default_profile);
    println!(
        "   Fallback profile: {}",
        options.fallback_profile.as_deref().unwrap_or("(none)")
    );
    println!("   Profiles available: {}", engine.list_profiles().len());
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(ctx: &Context) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let config_json =
        serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{config_json}");
    Ok(())
}
