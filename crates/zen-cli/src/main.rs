//! ZEN CLI
//!
//! Command-line host for the zen abbreviation expander

mod commands;
mod output;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use colored::Colorize;
use zen_core::init_tracing;

use commands::Context;

#[derive(Parser)]
#[command(name = "zen")]
#[command(about = "ZEN: expand zen-coding abbreviations into markup")]
#[command(version = zen_core::VERSION)]
#[command(
    long_about = "ZEN expands CSS-selector-like abbreviations into HTML/XML markup.\n\
\n\
Examples:\n  \
zen expand 'ul#nav>li.item$*3'        # Expand a whole abbreviation\n  \
zen expand '<p>a.x' --cursor 6         # Expand the abbreviation before a cursor\n  \
echo hello | zen wrap 'div>p'          # Wrap stdin with an abbreviation\n  \
zen profiles list                      # List available output profiles\n  \
zen config init                        # Initialize configuration file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.zenrc.json/.zenrc.toml/zen.yaml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Directory of custom profile files (overrides the config file)
    #[arg(long, global = true, env = "ZEN_PROFILES_DIR")]
    profiles_dir: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(
        long,
        value_enum,
        help = "Generate completion script for specified shell"
    )]
    generate_completion: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand the abbreviation that ends at the cursor
    Expand {
        /// Line of text containing the abbreviation
        line: String,

        /// Cursor byte offset (default: end of line)
        #[arg(long)]
        cursor: Option<usize>,

        /// Output profile (default: from configuration)
        #[arg(short, long)]
        profile: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Wrap text with an abbreviation
    Wrap {
        /// Abbreviation to wrap with
        abbreviation: String,

        /// File holding the text to wrap (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output profile (default: from configuration)
        #[arg(short, long)]
        profile: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Inspect output profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version {
        /// Show detailed version information
        #[arg(long)]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List built-in and custom profiles
    List {
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
    /// Show every setting of one profile
    Show {
        /// Profile name
        name: String,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Initialize a new configuration file
    Init {
        /// Configuration file format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Validate configuration file
    Validate {
        /// Configuration file to validate (default: discovered file)
        path: Option<PathBuf>,
    },
    /// Show the configuration in effect
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output, caret marked with `|`
    Human,
    /// JSON output for editor integrations
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

fn main() {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.generate_completion {
        generate_completion_script(shell);
        return;
    }

    let use_colors =
        !cli.no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
    colored::control::set_override(use_colors);

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "zen=error", // Only errors by default
        1 => "zen=warn",  // Warnings on first -v
        2 => "zen=info",  // Info on -vv
        3 => "zen=debug", // Debug on -vvv
        _ => "zen=trace", // Trace on -vvvv+
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    if let Err(e) = run_command(cli, use_colors) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn generate_completion_script(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn run_command(cli: Cli, use_colors: bool) -> anyhow::Result<()> {
    let ctx = Context {
        config_path: cli.config,
        profiles_dir: cli.profiles_dir,
        use_colors,
    };

    match cli.command {
        Some(Commands::Expand {
            line,
            cursor,
            profile,
            format,
        }) => commands::expand_command(&ctx, &line, cursor, profile.as_deref(), format),

        Some(Commands::Wrap {
            abbreviation,
            file,
            profile,
            format,
        }) => commands::wrap_command(&ctx, &abbreviation, file, profile.as_deref(), format),

        Some(Commands::Profiles { action }) => match action {
            ProfilesAction::List { format } => commands::profiles_list_command(&ctx, format),
            ProfilesAction::Show { name, format } => {
                commands::profiles_show_command(&ctx, &name, format)
            }
        },

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Validate { path } => {
                commands::config_validate_command(path.or(ctx.config_path))
            }
            ConfigAction::Show => commands::config_show_command(&ctx),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("zen {}", zen_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!("  Built-in profiles: {}", zen_core::BUILTIN_PROFILES.join(", "));
            } else {
                println!("{}", zen_core::VERSION);
            }
            Ok(())
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
