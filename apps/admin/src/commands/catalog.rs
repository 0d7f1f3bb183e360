//! Read-only catalog commands

use marquee_catalog_client::{ImportJobStatus, ImportStats, MediaType};

use super::Context;
use crate::error::AdminResult;

pub async fn status(ctx: &Context) -> AdminResult<()> {
    let status = ctx.orchestrator.poll().await?;
    println!("{}", describe_status(&status));
    Ok(())
}

pub async fn stats(ctx: &Context) -> AdminResult<()> {
    let stats = ctx.orchestrator.refresh_stats().await?;
    print!("{}", describe_stats(&stats));
    Ok(())
}

/// One-line description of a job status
pub fn describe_status(status: &ImportJobStatus) -> String {
    let label = status.media_type.plural_label();
    if !status.running {
        return format!("No import running (last: {}, {})", label, status.summary());
    }

    let mut line = if status.total_pages > 0 {
        format!(
            "Importing {}: page {}/{} ({:.0}%)",
            label,
            status.current_page,
            status.total_pages,
            status.progress_fraction() * 100.0
        )
    } else {
        format!("Importing {}", label)
    };

    let detail: Vec<&str> = [
        status.current_category_label.as_deref(),
        status.current_title_label.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|label| !label.trim().is_empty())
    .collect();
    if !detail.is_empty() {
        line.push_str(" - ");
        line.push_str(&detail.join(" / "));
    }

    line.push_str(&format!(", {}", status.summary()));
    line
}

/// Catalog totals, one category per line
pub fn describe_stats(stats: &ImportStats) -> String {
    let mut out = String::new();
    for media_type in MediaType::ALL {
        out.push_str(&format!(
            "{:<11} {}\n",
            media_type.plural_label(),
            stats.count_for(media_type)
        ));
        if media_type == MediaType::Series {
            out.push_str(&format!("{:<11} {}\n", "episodes", stats.episodes));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_running_status() {
        let status = ImportJobStatus {
            running: true,
            media_type: MediaType::Series,
            current_page: 3,
            total_pages: 12,
            current_category_label: Some("Drama".to_string()),
            current_title_label: Some("Northern Lights".to_string()),
            imported_count: 40,
            skipped_count: 5,
            error_count: 1,
        };

        assert_eq!(
            describe_status(&status),
            "Importing series: page 3/12 (25%) - Drama / Northern Lights, \
             40 imported, 5 skipped, 1 errors"
        );
    }

    #[test]
    fn test_describe_running_without_pages() {
        let status = ImportJobStatus {
            running: true,
            media_type: MediaType::Movie,
            ..ImportJobStatus::default()
        };
        assert_eq!(
            describe_status(&status),
            "Importing movies, 0 imported, 0 skipped, 0 errors"
        );
    }

    #[test]
    fn test_describe_idle_status() {
        let status = ImportJobStatus::idle(MediaType::Book);
        assert_eq!(
            describe_status(&status),
            "No import running (last: books, 0 imported, 0 skipped, 0 errors)"
        );
    }

    #[test]
    fn test_describe_stats() {
        let stats = ImportStats {
            movies: 120,
            series: 14,
            episodes: 410,
            books: 0,
            audiobooks: 3,
        };
        let text = describe_stats(&stats);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "movies      120");
        assert_eq!(lines[2], "episodes    410");
        assert_eq!(lines[4], "audiobooks  3");
    }
}
