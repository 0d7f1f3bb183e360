//! Subcommand implementations

mod catalog;
mod import;
mod intro;

use marquee_catalog_client::CatalogClient;
use marquee_core::{ActivityLog, BulkImportOrchestrator};
use tokio_util::sync::CancellationToken;

use crate::cli::Command;
use crate::config::Config;
use crate::error::AdminResult;

/// Everything a subcommand needs
pub struct Context {
    pub orchestrator: BulkImportOrchestrator<CatalogClient>,
    /// Cancelled on Ctrl-C
    pub interrupt: CancellationToken,
}

impl Context {
    pub fn new(client: CatalogClient, log: ActivityLog, config: &Config) -> Self {
        Self {
            orchestrator: BulkImportOrchestrator::new(client, log, config.import_settings()),
            interrupt: CancellationToken::new(),
        }
    }

    pub fn client(&self) -> &CatalogClient {
        self.orchestrator.runner()
    }

    pub fn log(&self) -> &ActivityLog {
        self.orchestrator.log()
    }
}

/// Run one subcommand to completion
pub async fn run(command: Command, ctx: &Context) -> AdminResult<()> {
    match command {
        Command::Status => catalog::status(ctx).await,
        Command::Stats => catalog::stats(ctx).await,
        Command::Import { media_type, size } => import::import(ctx, media_type, size.size).await,
        Command::ImportAll { size } => import::import_all(ctx, size.size).await,
        Command::Stop => import::stop(ctx).await,
        Command::Watch => import::watch(ctx).await,
        Command::Intro { action } => intro::run(ctx, action).await,
    }
}
