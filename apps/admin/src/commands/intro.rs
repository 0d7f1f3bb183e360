//! Intro marker commands

use marquee_catalog_client::IntroMarker;
use marquee_core::{IntroMarkerEditor, MarkerStore, PlaybackSnapshot};
use tracing::instrument;

use super::Context;
use crate::cli::IntroAction;
use crate::error::{AdminError, AdminResult};

pub async fn run(ctx: &Context, action: IntroAction) -> AdminResult<()> {
    match action {
        IntroAction::Get { episode } => {
            let marker = get(ctx.client(), &episode).await?;
            println!("{}", describe_marker(&episode, marker.as_ref()));
        }
        IntroAction::Set {
            episode,
            start,
            end,
        } => {
            let marker = set(ctx.client(), &episode, start, end).await?;
            ctx.log().success(format!(
                "Saved {}",
                describe_marker(&episode, marker.as_ref())
            ));
        }
        IntroAction::Clear { episode } => {
            clear(ctx.client(), &episode).await?;
            ctx.log()
                .success(format!("Cleared intro marker of episode {}", episode));
        }
    }
    Ok(())
}

fn episode_id(raw: &str) -> AdminResult<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AdminError::MissingEpisode);
    }
    Ok(trimmed)
}

pub async fn get<S: MarkerStore + ?Sized>(
    store: &S,
    episode: &str,
) -> AdminResult<Option<IntroMarker>> {
    let episode = episode_id(episode)?;
    let marker = store
        .intro_marker(episode)
        .await
        .map_err(marquee_core::CoreError::from)?;
    Ok(marker)
}

/// Save `[start, end]` through the same two-step editor the player uses:
/// each end is marked from a snapshot positioned at that time
#[instrument(skip(store))]
pub async fn set<S: MarkerStore + ?Sized>(
    store: &S,
    episode: &str,
    start: f64,
    end: f64,
) -> AdminResult<Option<IntroMarker>> {
    let episode = episode_id(episode)?;
    if !start.is_finite() || start < 0.0 {
        return Err(AdminError::InvalidWindow(format!(
            "start must be a non-negative number of seconds, got {}",
            start
        )));
    }

    let mut editor = IntroMarkerEditor::new();
    editor.mark_start(&positioned_at(start));
    editor.mark_end(&positioned_at(end));
    Ok(editor.save(store, episode).await?)
}

pub async fn clear<S: MarkerStore + ?Sized>(store: &S, episode: &str) -> AdminResult<()> {
    let episode = episode_id(episode)?;
    IntroMarkerEditor::new().save(store, episode).await?;
    Ok(())
}

fn positioned_at(seconds: f64) -> PlaybackSnapshot {
    PlaybackSnapshot {
        current_time: seconds,
        ..PlaybackSnapshot::default()
    }
}

fn describe_marker(episode: &str, marker: Option<&IntroMarker>) -> String {
    match marker {
        Some(marker) => format!(
            "intro of episode {}: {:.1}s - {:.1}s ({:.1}s)",
            episode,
            marker.start,
            marker.end,
            marker.duration()
        ),
        None => format!("episode {} has no intro marker", episode),
    }
}
