//! Kitchen Dashboard - CLI entry point
//!
//! Runs the terminal dashboard and offers a few maintenance commands for the
//! per-profile widget settings and the config file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use kitchen_dashboard::commands::{self, Overrides, RunOptions};
use kitchen_dashboard::config::{default, xdg, Config, ConfigError, ConfigLoader};
use kitchen_dashboard::dashboard_api::DashboardClient;
use kitchen_dashboard::logging::{self, LogDestination};
use kitchen_dashboard::tui::App;

/// Kitchen widget dashboard
#[derive(Parser)]
#[command(name = "kdash")]
#[command(version, about = "Profile-aware kitchen widget dashboard")]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/kitchen-dashboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands for kdash
#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal dashboard (default)
    Tui {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Read or write a profile's widget settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Backend and profile selection, overriding the config file.
#[derive(Args, Default)]
struct TargetArgs {
    /// Profile to load
    #[arg(long)]
    profile: Option<String>,

    /// Backend base URL
    #[arg(long)]
    server: Option<String>,
}

impl From<TargetArgs> for Overrides {
    fn from(args: TargetArgs) -> Self {
        Overrides {
            profile: args.profile,
            server: args.server,
        }
    }
}

/// Actions for the `settings` subcommand.
#[derive(Subcommand)]
enum SettingsAction {
    /// Print the profile's settings as JSON
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Save settings from a JSON file for the profile
    Push {
        /// JSON file holding a mapping from widget id to settings
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command.unwrap_or(Commands::Tui {
        target: TargetArgs::default(),
    }) {
        Commands::Tui { target } => run_tui(config_path.as_deref(), target.into()),
        Commands::Settings { action } => run_settings(config_path.as_deref(), action),
        Commands::Config { action } => run_config(config_path.as_deref(), action),
    }
}

/// Loads the config file and applies flag overrides.
fn load_options(config_path: Option<&Path>, overrides: &Overrides) -> Result<RunOptions, ConfigError> {
    let config = ConfigLoader::load(config_path)?;
    RunOptions::resolve(&config, overrides)
}

fn run_tui(config_path: Option<&Path>, overrides: Overrides) -> ExitCode {
    let options = match load_options(config_path, &overrides) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let destination = LogDestination::for_tui(options.log_file.clone());
    if let Err(e) = logging::init(options.log_level, &destination) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }
    let client = match DashboardClient::new(&options.base_url, options.timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(profile = %options.profile, server = %options.base_url, "starting dashboard");

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime for TUI");
    let result = rt.block_on(async {
        let mut app = App::new(Arc::new(client), options.profile, options.tick_rate);
        app.run().await
    });
    if let Err(e) = result {
        eprintln!("TUI error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_settings(config_path: Option<&Path>, action: SettingsAction) -> ExitCode {
    let (target, file) = match action {
        SettingsAction::Show { target } => (target, None),
        SettingsAction::Push { file, target } => (target, Some(file)),
    };
    let options = match load_options(config_path, &target.into()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(
        options.log_level,
        &LogDestination::for_command(options.log_file.clone()),
    ) {
        eprintln!("Failed to open log file: {e}");
        return ExitCode::FAILURE;
    }
    let client = match DashboardClient::new(&options.base_url, options.timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    let result = rt.block_on(async {
        match file {
            None => commands::show_settings(&client, &options.profile)
                .await
                .map(|json| println!("{json}")),
            Some(file) => commands::push_settings(&client, &options.profile, &file)
                .await
                .map(|count| {
                    println!("Saved {count} widget(s) for profile '{}'", options.profile)
                }),
        }
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_config(config_path: Option<&Path>, action: ConfigAction) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => default::create_default_config(force).map(|path| {
            println!("Created configuration at {}", path.display());
        }),
        ConfigAction::Path => {
            let path = config_path.map_or_else(xdg::config_path, Path::to_path_buf);
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Validate => validate(config_path).map(|config| {
            println!("Configuration is valid");
            println!("{config:#?}");
        }),
    };
    if let Err(e) = result {
        eprintln!("Config error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn validate(config_path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = ConfigLoader::load(config_path)?;
    config.validate()?;
    Ok(config)
}
