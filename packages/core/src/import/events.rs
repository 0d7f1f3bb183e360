use marquee_catalog_client::{ImportJobStatus, MediaType};

/// Progress notifications broadcast by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    /// A poll returned this status
    StatusUpdated(ImportJobStatus),
    /// The runner accepted a job for this category
    PhaseStarted(MediaType),
    /// The job for this category stopped running
    PhaseCompleted {
        media_type: MediaType,
        imported: u32,
        skipped: u32,
        errors: u32,
    },
    /// New titles landed; catalog totals should be reloaded
    RefreshStats,
    /// The last phase finished or the chain was stopped
    ChainFinished,
}
