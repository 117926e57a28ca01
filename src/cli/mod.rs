//! Command-line interface for par-nav.
//!
//! The binary replays navigation scripts (see [`script`]) through a live
//! navigator and prints every published snapshot. Replay itself lives in
//! the [`replay`] submodule.

pub mod replay;
pub mod script;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use par_nav_config::NavigatorConfig;
use std::path::PathBuf;

pub use replay::{ReplayReport, replay};
pub use script::{Route, Script, ScriptCommand};

/// par-nav - A hierarchical navigation engine
#[derive(Parser)]
#[command(name = "par-nav")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Navigator config file (default: ~/.config/par-nav/navigator.yaml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides config and RUST_LOG)
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Replay a script and print every snapshot
    Replay {
        /// YAML script to replay
        script: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a script silently; exit non-zero on any error or invalid tree
    Check {
        /// YAML script to check
        script: PathBuf,
    },

    /// Print the default navigator config
    DefaultConfig,
}

/// What `main` should run after logging is up
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub command: Commands,
    pub config: NavigatorConfig,
    /// Log level override from CLI, falling back to the config file
    pub log_level: log::LevelFilter,
}

/// Result of CLI processing
pub enum CliResult {
    /// Run a script command once logging is initialized
    Run(RunOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands that need no navigator
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();

    if let Commands::DefaultConfig = cli.command {
        return match serde_yaml_ng::to_string(&NavigatorConfig::default()) {
            Ok(yaml) => {
                print!("{yaml}");
                CliResult::Exit(0)
            }
            Err(e) => {
                eprintln!("par-nav: error: {e}");
                CliResult::Exit(1)
            }
        };
    }

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("par-nav: error: {e:#}");
            return CliResult::Exit(1);
        }
    };

    let log_level = cli
        .log_level
        .map(LogLevelArg::to_level_filter)
        .unwrap_or_else(|| config.log_level.to_level_filter());

    CliResult::Run(RunOptions {
        command: cli.command,
        config,
        log_level,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<NavigatorConfig> {
    match path {
        Some(path) => NavigatorConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => NavigatorConfig::load(),
    }
}

/// Run a script command; returns the process exit code
pub fn run(options: RunOptions) -> Result<i32> {
    match options.command {
        Commands::Replay { script, json } => {
            let report = replay(&Script::load(&script)?, options.config)?;
            if json {
                println!("{}", report.render_json()?);
            } else {
                print!("{}", report.render_text());
            }
            Ok(0)
        }
        Commands::Check { script } => {
            let report = replay(&Script::load(&script)?, options.config)?;
            let failed: Vec<_> = report
                .steps
                .iter()
                .filter(|step| step.failed || step.invalid.is_some())
                .collect();
            for step in &failed {
                println!("[{}] {}: {}", step.step, step.command, step.outcome);
                if let Some(reason) = &step.invalid {
                    println!("    invalid tree: {reason}");
                }
            }
            if report.is_clean() {
                println!("{}: {} commands ok", script.display(), report.steps.len() - 1);
                Ok(0)
            } else {
                println!("{}: {} failing step(s)", script.display(), failed.len());
                Ok(1)
            }
        }
        Commands::DefaultConfig => Ok(0),
    }
}
