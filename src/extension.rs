//! Command host: activation, command registry and presentation surface
//!
//! `activate` registers the check commands into a caller-owned
//! [`CommandRegistry`] and hands back the [`Subscriptions`] needed to
//! remove them again.

use crate::config::Config;
use crate::render::{self, REPORT_TITLE, ReportFormat};
use crate::scanner::Scanner;
use crate::types::ScanOutcome;
use crate::vcs::SourceControl;
use crate::vcs::git::GitProvider;
use anyhow::{Context, bail};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

pub const CHECK_SHARED_COMPONENTS: &str = "share-keeper.checkSharedComponents";
pub const CHECK_DIRECT_IMPORTS: &str = "share-keeper.checkDirectImports";

pub const NO_PROVIDER_MESSAGE: &str = "Please install Git to check for direct imports";

pub type CommandFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
pub type CommandHandler = Arc<dyn Fn() -> CommandFuture + Send + Sync>;

/// Named commands that can be executed later
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn register(&mut self, id: &str, handler: CommandHandler) -> anyhow::Result<()> {
        if self.commands.contains_key(id) {
            bail!("Command {} is already registered", id);
        }
        debug!("Registered command {}", id);
        self.commands.insert(id.to_string(), handler);
        Ok(())
    }

    pub fn unregister(&mut self, id: &str) {
        if self.commands.remove(id).is_some() {
            debug!("Unregistered command {}", id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    pub async fn execute(&self, id: &str) -> anyhow::Result<()> {
        let handler = self
            .commands
            .get(id)
            .with_context(|| format!("Unknown command: {}", id))?
            .clone();
        debug!("Executing command {}", id);
        handler().await
    }
}

/// Commands registered by [`activate`]
#[must_use = "dispose the subscriptions to unregister the commands"]
pub struct Subscriptions {
    ids: Vec<String>,
}

impl Subscriptions {
    pub fn dispose(self, registry: &mut CommandRegistry) {
        for id in &self.ids {
            registry.unregister(id);
        }
    }
}

/// Where notifications and report panels are shown
pub trait Window: Send + Sync {
    fn show_information_message(&self, message: &str);

    fn create_panel(&self, title: &str, content: &str) -> anyhow::Result<()>;

    /// Format the panel content should be rendered in
    fn report_format(&self) -> ReportFormat;
}

/// Prints panels to stdout, or writes them to an output file
pub struct TerminalWindow {
    output: Option<String>,
    format: ReportFormat,
}

impl TerminalWindow {
    pub fn new(output: Option<String>) -> anyhow::Result<Self> {
        let format = match &output {
            Some(path) => ReportFormat::from_path(path)
                .with_context(|| format!("Output file {} must end with .md, .html or .json", path))?,
            None => ReportFormat::Markdown,
        };
        Ok(Self { output, format })
    }
}

impl Window for TerminalWindow {
    fn show_information_message(&self, message: &str) {
        info!("{}", message);
    }

    fn create_panel(&self, title: &str, content: &str) -> anyhow::Result<()> {
        match &self.output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write output file {}", path))?;
                info!("{} report written to {}", title, path);
            }
            None => println!("{}", content),
        }
        Ok(())
    }

    fn report_format(&self) -> ReportFormat {
        self.format
    }
}

/// Everything the registered commands need
pub struct ExtensionContext {
    pub config: Config,
    /// Directories whose repositories are scanned
    pub repos: Vec<PathBuf>,
    pub window: Arc<dyn Window>,
    /// Fail the command when any direct import is found
    pub fail_on_violations: bool,
}

/// Register the check commands and return the handle that removes them
pub fn activate(
    registry: &mut CommandRegistry,
    context: ExtensionContext,
) -> anyhow::Result<Subscriptions> {
    let context = Arc::new(context);
    let mut ids = Vec::new();

    for id in [CHECK_SHARED_COMPONENTS, CHECK_DIRECT_IMPORTS] {
        let context = context.clone();
        let handler: CommandHandler = Arc::new(move || -> CommandFuture {
            let context = context.clone();
            Box::pin(async move { check_shared_components(&context).await })
        });
        registry.register(id, handler)?;
        ids.push(id.to_string());
    }

    Ok(Subscriptions { ids })
}

async fn check_shared_components(context: &ExtensionContext) -> anyhow::Result<()> {
    let provider = GitProvider::locate(context.repos.clone()).await;
    run_check(context, provider.as_ref()).await
}

/// Scan and present the report, or notify when there is no provider
async fn run_check<P: SourceControl>(
    context: &ExtensionContext,
    provider: Option<&P>,
) -> anyhow::Result<()> {
    let scanner = Scanner::new(&context.config)?;

    let result = match scanner.check(provider).await? {
        ScanOutcome::NoProvider => {
            context.window.show_information_message(NO_PROVIDER_MESSAGE);
            return Ok(());
        }
        ScanOutcome::Scanned(result) => result,
    };

    let content = render::render(
        &result,
        &context.config.rule.module,
        context.window.report_format(),
    );
    context.window.create_panel(REPORT_TITLE, &content)?;

    if context.fail_on_violations && !result.is_empty() {
        bail!(
            "Found {} direct imports in {} files",
            result.total_lines(),
            result.total_files()
        );
    }
    Ok(())
}
