// FormatExtractor trait and shared listing configuration

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::FormatDescriptor;

/// Configuration for a listing request
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Hard deadline for the tool invocation, seconds
    pub timeout_seconds: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: crate::downloader::ytdlp::LISTING_TIMEOUT_SECS,
        }
    }
}

/// Trait for format discovery implementations
#[async_trait]
pub trait FormatExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// List selectable mp4 variants for a URL, de-duplicated by quality and
    /// sorted best-first.
    async fn extract_formats(
        &self,
        url: &str,
        config: &ListingConfig,
    ) -> Result<Vec<FormatDescriptor>, DownloadError>;
}
