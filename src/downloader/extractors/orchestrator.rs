// Format discovery - structured mode preferred, heuristic scrape fallback
//
// Strategy:
// 1. Ask the fetch tool for its JSON dump (robust against table changes)
// 2. On refusal, fall back to scraping the tabular listing
// 3. A timeout in either mode ends the request - no second deadline

use tracing::{debug, warn};

use super::json::JsonFormatExtractor;
use super::listing::ListingFormatExtractor;
use super::traits::{FormatExtractor, ListingConfig};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::FormatDescriptor;
use crate::downloader::ytdlp::YtDlp;

/// Orchestrator over the two discovery modes
pub struct FormatDiscovery {
    json: JsonFormatExtractor,
    listing: ListingFormatExtractor,
}

impl FormatDiscovery {
    pub fn new(ytdlp: YtDlp) -> Self {
        Self {
            json: JsonFormatExtractor::new(ytdlp.clone()),
            listing: ListingFormatExtractor::new(ytdlp),
        }
    }

    pub async fn list(
        &self,
        url: &str,
        config: &ListingConfig,
    ) -> Result<Vec<FormatDescriptor>, DownloadError> {
        match self.json.extract_formats(url, config).await {
            Ok(formats) => {
                debug!(
                    extractor = self.json.name(),
                    count = formats.len(),
                    "format discovery succeeded"
                );
                return Ok(formats);
            }
            Err(DownloadError::Timeout) => return Err(DownloadError::Timeout),
            Err(e) => {
                warn!(
                    extractor = self.json.name(),
                    error = %e,
                    "structured discovery failed, falling back to listing scrape"
                );
            }
        }

        let formats = self.listing.extract_formats(url, config).await?;
        debug!(
            extractor = self.listing.name(),
            count = formats.len(),
            "format discovery succeeded"
        );
        Ok(formats)
    }
}
