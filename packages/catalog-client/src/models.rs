//! Catalog API request/response models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Media category an import job runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Book,
    Audiobook,
}

impl MediaType {
    /// All categories in catalog order
    pub const ALL: [MediaType; 4] = [
        MediaType::Movie,
        MediaType::Series,
        MediaType::Book,
        MediaType::Audiobook,
    ];

    /// Wire name used by the catalog API
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Book => "book",
            MediaType::Audiobook => "audiobook",
        }
    }

    /// Plural label for user-facing messages
    pub fn plural_label(&self) -> &'static str {
        match self {
            MediaType::Movie => "movies",
            MediaType::Series => "series",
            MediaType::Book => "books",
            MediaType::Audiobook => "audiobooks",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaType::Movie),
            "series" | "tv" | "show" | "shows" => Ok(MediaType::Series),
            "book" | "books" => Ok(MediaType::Book),
            "audiobook" | "audiobooks" => Ok(MediaType::Audiobook),
            other => Err(format!("unknown media type '{}'", other)),
        }
    }
}

/// Server-side import job status as reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJobStatus {
    /// Whether a job is currently executing
    pub running: bool,
    /// Category of the current (or last) job
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// Provider category being imported (e.g. a genre or list name)
    #[serde(default)]
    pub current_category_label: Option<String>,
    /// Title currently being processed
    #[serde(default)]
    pub current_title_label: Option<String>,
    #[serde(default)]
    pub imported_count: u32,
    #[serde(default)]
    pub skipped_count: u32,
    #[serde(default)]
    pub error_count: u32,
}

impl ImportJobStatus {
    /// Status of an idle runner for the given category
    pub fn idle(media_type: MediaType) -> Self {
        Self {
            media_type,
            ..Self::default()
        }
    }

    /// Page progress in [0, 1]; zero when the total is not known yet
    pub fn progress_fraction(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (f64::from(self.current_page) / f64::from(self.total_pages)).clamp(0.0, 1.0)
    }

    /// One-line count summary for activity messages
    pub fn summary(&self) -> String {
        format!(
            "{} imported, {} skipped, {} errors",
            self.imported_count, self.skipped_count, self.error_count
        )
    }
}

/// Catalog totals shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    #[serde(default)]
    pub movies: u64,
    #[serde(default)]
    pub series: u64,
    #[serde(default)]
    pub episodes: u64,
    #[serde(default)]
    pub books: u64,
    #[serde(default)]
    pub audiobooks: u64,
}

impl ImportStats {
    /// Total count for one category
    pub fn count_for(&self, media_type: MediaType) -> u64 {
        match media_type {
            MediaType::Movie => self.movies,
            MediaType::Series => self.series,
            MediaType::Book => self.books,
            MediaType::Audiobook => self.audiobooks,
        }
    }
}

/// Intro window of an episode, in seconds from the start of the media
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntroMarker {
    pub start: f64,
    pub end: f64,
}

impl IntroMarker {
    /// Build a marker, returning `None` when the window is malformed
    pub fn new(start: f64, end: f64) -> Option<Self> {
        let marker = Self { start, end };
        marker.is_valid().then_some(marker)
    }

    /// A marker is usable only when both ends are finite, start is
    /// non-negative and end lies strictly after start
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }

    /// Closed-interval membership test
    pub fn contains(&self, seconds: f64) -> bool {
        self.is_valid() && seconds >= self.start && seconds <= self.end
    }

    /// Window length in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

// Internal request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartImportRequest {
    pub media_type: MediaType,
    pub size_parameter: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartImportResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Error body returned by the catalog API
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn into_reason(self) -> Option<String> {
        self.error
            .or(self.message)
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty())
    }
}
