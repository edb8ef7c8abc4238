mod cli;
mod config;
mod extension;
mod render;
mod rule;
mod scanner;
mod types;
mod util;
mod vcs;

use clap::Parser;
use cli::{CheckArgs, Cli, Commands, InitArgs};
use config::Config;
use extension::{CommandRegistry, ExtensionContext, TerminalWindow};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init(args) => init(&args),
        Commands::CheckSharedComponents(args) => {
            check(extension::CHECK_SHARED_COMPONENTS, args).await
        }
        Commands::CheckDirectImports(args) => check(extension::CHECK_DIRECT_IMPORTS, args).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn init(args: &InitArgs) -> anyhow::Result<()> {
    config::write_scaffold(&args.config, args.r#override)?;
    info!("Config written to {}", args.config);
    Ok(())
}

async fn check(command: &str, args: CheckArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.config, &args.config_overrides)?;
    debug!("Loaded config: {:?}", config);

    let repos = if args.repos.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.repos.iter().map(PathBuf::from).collect()
    };

    let context = ExtensionContext {
        config,
        repos,
        window: Arc::new(TerminalWindow::new(args.output)?),
        fail_on_violations: args.fail_on_violations,
    };

    let mut registry = CommandRegistry::default();
    let subscriptions = extension::activate(&mut registry, context)?;
    let result = registry.execute(command).await;
    subscriptions.dispose(&mut registry);
    result
}
