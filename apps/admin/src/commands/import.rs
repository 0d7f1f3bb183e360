//! Import job commands

use marquee_catalog_client::MediaType;
use marquee_core::{BulkImportOrchestrator, ImportEvent, ImportJobRunner};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::catalog::describe_status;
use super::Context;
use crate::error::{AdminError, AdminResult};

pub async fn import(ctx: &Context, media_type: MediaType, size: Option<u32>) -> AdminResult<()> {
    let events = ctx.orchestrator.subscribe();
    // Refresh the last known status so the already-running guard is current
    ctx.orchestrator.initialize().await?;
    ctx.orchestrator.start(media_type, size).await?;
    follow(&ctx.orchestrator, events, &ctx.interrupt).await
}

pub async fn import_all(ctx: &Context, size: Option<u32>) -> AdminResult<()> {
    let events = ctx.orchestrator.subscribe();
    ctx.orchestrator.initialize().await?;
    ctx.orchestrator.start_all(size).await?;
    follow(&ctx.orchestrator, events, &ctx.interrupt).await
}

pub async fn stop(ctx: &Context) -> AdminResult<()> {
    ctx.orchestrator.stop().await?;
    let status = ctx.orchestrator.poll().await?;
    println!("{}", describe_status(&status));
    Ok(())
}

/// Resume following a job started elsewhere
pub async fn watch(ctx: &Context) -> AdminResult<()> {
    let events = ctx.orchestrator.subscribe();
    let status = ctx.orchestrator.initialize().await?;
    if !status.running {
        println!("{}", describe_status(&status));
        return Ok(());
    }
    follow(&ctx.orchestrator, events, &ctx.interrupt).await
}

/// Print import events until the poll loop ends. `interrupt` shuts the
/// orchestrator down and reports [`AdminError::Interrupted`].
pub async fn follow<R: ImportJobRunner>(
    orchestrator: &BulkImportOrchestrator<R>,
    mut events: broadcast::Receiver<ImportEvent>,
    interrupt: &CancellationToken,
) -> AdminResult<()> {
    let idle = orchestrator.wait_idle();
    tokio::pin!(idle);
    let mut events_open = true;

    loop {
        tokio::select! {
            () = &mut idle => break,
            event = events.recv(), if events_open => match event {
                Ok(event) => report(&event),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Missed import events"),
                Err(RecvError::Closed) => events_open = false,
            },
            () = interrupt.cancelled() => {
                orchestrator.shutdown().await;
                (&mut idle).await;
                return Err(AdminError::Interrupted);
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        report(&event);
    }
    Ok(())
}

fn report(event: &ImportEvent) {
    if let Some(line) = describe_event(event) {
        println!("{}", line);
    }
}

/// Console line for an event; `None` for events with nothing to show
pub fn describe_event(event: &ImportEvent) -> Option<String> {
    match event {
        ImportEvent::StatusUpdated(status) if status.running => Some(describe_status(status)),
        ImportEvent::StatusUpdated(_) | ImportEvent::RefreshStats => None,
        ImportEvent::PhaseStarted(media_type) => {
            Some(format!("Started import of {}", media_type.plural_label()))
        }
        ImportEvent::PhaseCompleted {
            media_type,
            imported,
            skipped,
            errors,
        } => Some(format!(
            "Finished {}: {} imported, {} skipped, {} errors",
            media_type.plural_label(),
            imported,
            skipped,
            errors
        )),
        ImportEvent::ChainFinished => Some("All phases done".to_string()),
    }
}
