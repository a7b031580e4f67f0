// Heuristic scrape of the fetch tool's tabular format listing (`-F`)
//
// Kept line-for-line compatible with the historical behavior: mp4 lines
// carrying a WxH or NNNp token, numeric format ids only, first hit per
// quality label wins, result sorted best-first.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::traits::{FormatExtractor, ListingConfig};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::FormatDescriptor;
use crate::downloader::ytdlp::YtDlp;

lazy_static! {
    static ref NUMERIC_ID_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Extractor that parses the human-readable format table
pub struct ListingFormatExtractor {
    ytdlp: YtDlp,
}

impl ListingFormatExtractor {
    pub fn new(ytdlp: YtDlp) -> Self {
        Self { ytdlp }
    }
}

#[async_trait]
impl FormatExtractor for ListingFormatExtractor {
    fn name(&self) -> &'static str {
        "listing"
    }

    async fn extract_formats(
        &self,
        url: &str,
        config: &ListingConfig,
    ) -> Result<Vec<FormatDescriptor>, DownloadError> {
        let stdout = self
            .ytdlp
            .list_formats_text(url, config.timeout_seconds)
            .await?;
        Ok(dedupe_and_rank(parse_listing(&stdout)))
    }
}

/// Scan one stdout dump for selectable mp4 variants.
pub fn parse_listing(stdout: &str) -> Vec<FormatDescriptor> {
    let mut formats = Vec::new();

    for line in stdout.lines() {
        if !(line.contains("mp4") && (line.contains('x') || line.contains('p'))) {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }
        let format_id = parts[0];

        // The first WxH token wins; failing that, the first NNNp token.
        let mut quality = None;
        for part in &parts {
            if part.contains('x') {
                if let Some(height) = part.split('x').nth(1) {
                    quality = Some(format!("{}p", height));
                }
                break;
            } else if part.ends_with('p') {
                quality = Some(part.to_string());
                break;
            }
        }

        let Some(quality) = quality else { continue };
        if !NUMERIC_ID_RE.is_match(format_id) {
            // Named ids (audio-only formats, storyboards) are excluded
            continue;
        }

        formats.push(FormatDescriptor {
            format_id: format_id.to_string(),
            quality,
            description: line.trim().to_string(),
        });
    }

    formats
}

/// First occurrence per quality label wins; the result is sorted descending
/// by the numeric value of the label. Shared by both discovery modes.
pub fn dedupe_and_rank(formats: Vec<FormatDescriptor>) -> Vec<FormatDescriptor> {
    let mut unique: Vec<FormatDescriptor> = Vec::new();
    for fmt in formats {
        if !unique.iter().any(|f| f.quality == fmt.quality) {
            unique.push(fmt);
        }
    }
    unique.sort_by(|a, b| b.quality_height().cmp(&a.quality_height()));
    unique
}
