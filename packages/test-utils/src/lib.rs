//! Shared test utilities for the Marquee workspace
//!
//! This crate provides a mock catalog server so the catalog client and the
//! import orchestrator can be tested without a real backend.
//!
//! # Mock Services
//!
//! - [`MockCatalogServer`] - Mock catalog API (import jobs, stats, intro markers)
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_test_utils::{ImportStatusFixture, MockCatalogServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let server = MockCatalogServer::start().await;
//!     server.mock_start_accepted().await;
//!     server
//!         .mock_status_sequence(vec![
//!             ImportStatusFixture::running("movie", 1, 3),
//!             ImportStatusFixture::finished("movie", 12, 1, 0),
//!         ])
//!         .await;
//!
//!     // Use server.url() and server.token() to configure your client
//! }
//! ```

mod catalog;

pub use catalog::{ImportStatsFixture, ImportStatusFixture, MockCatalogServer};
