#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use opsec_arbiter::config::{self, ConfigDocument};
use opsec_arbiter::status::describe_outcome;
use opsec_arbiter::{
    ArbitrationGate, DecisionSnapshot, ManifestDirRegistry, OverrideCanceller, RestartStatus,
    freeze_at_startup,
};

#[derive(Debug, Parser)]
#[command(name = "opsec-arbiter", version, about = "Startup arbitration for foreign translation overrides")]
struct Cli {
    /// Settings file (defaults to <config dir>/opsec/opsec.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of loaded module manifests (defaults to <config dir>/opsec/modules)
    #[arg(long, global = true)]
    modules: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the startup decision and whether a restart is pending
    Status,
    /// Change a setting, then report whether it needs a restart
    Set {
        setting: SettingName,
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
    /// Ask the gate whether an override would be suppressed
    Check {
        candidate: String,
        /// Target ids passed along by the host (not used in the decision)
        #[arg(long = "target")]
        targets: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SettingName {
    /// foreignOverrideFixEnabled
    Fix,
    /// translationProtectionEnabled
    Protection,
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")
}

fn print_status(snapshot: &DecisionSnapshot, status: &RestartStatus, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(status)?);
        return Ok(());
    }

    println!("startup: {}", describe_outcome(snapshot.outcome()));
    println!("applied at startup: {}", status.applied_at_startup);
    println!("current setting: {}", status.current_effective);
    if let Some(warning) = status.warning() {
        println!("warning: {warning}");
    }
    Ok(())
}

fn set_setting(config_path: &Path, setting: SettingName, value: bool) -> Result<()> {
    let mut document = ConfigDocument::load(config_path)?;
    match setting {
        SettingName::Fix => document.settings.foreign_override_fix = value,
        SettingName::Protection => document.settings.translation_protection = value,
    }
    document.save(config_path)?;
    info!(setting = ?setting, value, "Updated setting");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config_path = cli.config.unwrap_or_else(config::config_path);
    let modules_dir = cli.modules.unwrap_or_else(config::modules_dir);
    let registry = ManifestDirRegistry::new(modules_dir);
    info!(config = %config_path.display(), modules = %registry.dir().display(), "Starting arbitration");

    // Decision is frozen before any command touches the settings file
    let snapshot = freeze_at_startup(&registry, &config_path);

    match cli.command {
        Command::Status => {
            let status = RestartStatus::evaluate(snapshot, &config_path);
            print_status(snapshot, &status, cli.json)?;
        }
        Command::Set { setting, value } => {
            set_setting(&config_path, setting, value)?;
            let status = RestartStatus::evaluate(snapshot, &config_path);
            print_status(snapshot, &status, cli.json)?;
        }
        Command::Check { candidate, targets } => {
            let suppress = ArbitrationGate::new(snapshot).should_suppress(&targets, &candidate);
            if cli.json {
                println!("{}", serde_json::json!({ "candidate": candidate, "suppress": suppress }));
            } else {
                println!("{}", if suppress { "suppress" } else { "allow" });
            }
        }
    }

    Ok(())
}
