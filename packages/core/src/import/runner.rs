use async_trait::async_trait;
use marquee_catalog_client::{CatalogClient, CatalogResult, ImportJobStatus, ImportStats, MediaType};

/// External job runner the orchestrator drives
#[async_trait]
pub trait ImportJobRunner: Send + Sync + 'static {
    async fn start(&self, media_type: MediaType, size: u32) -> CatalogResult<()>;
    async fn stop(&self) -> CatalogResult<()>;
    async fn status(&self) -> CatalogResult<ImportJobStatus>;
    async fn stats(&self) -> CatalogResult<ImportStats>;
}

#[async_trait]
impl ImportJobRunner for CatalogClient {
    async fn start(&self, media_type: MediaType, size: u32) -> CatalogResult<()> {
        self.start_import(media_type, size).await
    }

    async fn stop(&self) -> CatalogResult<()> {
        self.stop_import().await
    }

    async fn status(&self) -> CatalogResult<ImportJobStatus> {
        self.import_status().await
    }

    async fn stats(&self) -> CatalogResult<ImportStats> {
        self.import_stats().await
    }
}
