//! Background bulk-import orchestration

mod chain;
mod events;
mod orchestrator;
mod runner;

pub use chain::ImportChain;
pub use events::ImportEvent;
pub use orchestrator::{BulkImportOrchestrator, ImportSettings};
pub use runner::ImportJobRunner;
