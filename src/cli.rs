use crate::config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};

// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser)]
#[command(
    name = "sharekeeper",
    version,
    about = "Flag direct UI library imports in uncommitted React component changes",
    long_about = None
)]
pub struct Cli {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: SHAREKEEPER_LOG=] [default: info]
    #[arg(
        long,
        env = "SHAREKEEPER_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a default sharekeeper.toml config file
    Init(InitArgs),
    /// Check uncommitted React component changes for direct imports
    #[command(name = "check", visible_alias = "check-shared-components")]
    CheckSharedComponents(CheckArgs),
    /// Same as `check`, registered under its own command id
    CheckDirectImports(CheckArgs),
}

/// Arguments for the init command
#[derive(Parser)]
pub struct InitArgs {
    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override existing config file
    #[arg(long)]
    pub r#override: bool,
}

/// Arguments for the check commands
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to config file (initialize with `sharekeeper init`)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override config values using dot notation (e.g. rule.module=@acme/ui)
    #[arg(long = "config-override")]
    pub config_overrides: Vec<String>,

    /// Directory inside a repository to check, repeatable [default: .]
    #[arg(long = "repo")]
    pub repos: Vec<String>,

    /// Output file path (.md, .html or .json) instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Exit with an error when any direct import is found
    #[arg(long)]
    pub fail_on_violations: bool,
}
