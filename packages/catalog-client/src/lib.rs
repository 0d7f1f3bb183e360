//! Catalog API client for Marquee
//!
//! This crate provides a client for the catalog/metadata REST API and the
//! episode metadata API, enabling:
//! - Bulk import job control (start, stop, status) and catalog totals
//! - Intro marker retrieval and editing
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee_catalog_client::{CatalogClient, MediaType};
//! use marquee_shared_config::CatalogConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new(&CatalogConfig::new("http://localhost:8080"))?;
//!
//! client.start_import(MediaType::Movie, 50).await?;
//! let status = client.import_status().await?;
//! println!("running={} {}", status.running, status.summary());
//!
//! if let Some(marker) = client.intro_marker("s01e01").await? {
//!     println!("intro {}s-{}s", marker.start, marker.end);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `MARQUEE_API_URL`: catalog server base URL (required)
//! - `MARQUEE_API_TOKEN`: bearer token (optional)

mod client;
mod error;
mod models;

pub use client::CatalogClient;
pub use error::{CatalogError, CatalogResult};
pub use models::{ImportJobStatus, ImportStats, IntroMarker, MediaType};
