// Structured discovery via the fetch tool's JSON dump (`-J`)
//
// Preferred over scraping the tabular listing; produces the same descriptor
// shape so both modes share the dedupe/rank step.

use async_trait::async_trait;
use serde_json::Value;

use super::listing::dedupe_and_rank;
use super::traits::{FormatExtractor, ListingConfig};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::FormatDescriptor;
use crate::downloader::ytdlp::YtDlp;

/// Extractor that reads the machine-readable info dump
pub struct JsonFormatExtractor {
    ytdlp: YtDlp,
}

impl JsonFormatExtractor {
    pub fn new(ytdlp: YtDlp) -> Self {
        Self { ytdlp }
    }
}

#[async_trait]
impl FormatExtractor for JsonFormatExtractor {
    fn name(&self) -> &'static str {
        "json"
    }

    async fn extract_formats(
        &self,
        url: &str,
        config: &ListingConfig,
    ) -> Result<Vec<FormatDescriptor>, DownloadError> {
        let json = self.ytdlp.dump_json(url, config.timeout_seconds).await?;
        Ok(dedupe_and_rank(parse_formats(&json)?))
    }
}

/// Map the dump's formats array onto descriptors, applying the same
/// selection rules as the scrape: mp4 video with a known height, numeric id.
fn parse_formats(json: &Value) -> Result<Vec<FormatDescriptor>, DownloadError> {
    let formats_array = json["formats"]
        .as_array()
        .ok_or_else(|| DownloadError::ParseError("No formats array in JSON".to_string()))?;

    let mut out = Vec::new();
    for f in formats_array {
        if f["ext"].as_str() != Some("mp4") {
            continue;
        }
        let Some(height) = f["height"].as_u64().filter(|h| *h > 0) else {
            continue;
        };
        let format_id = f["format_id"].as_str().unwrap_or("");
        if format_id.is_empty() || !format_id.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let resolution = f["resolution"]
            .as_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{}x{}", f["width"].as_u64().unwrap_or(0), height));
        let note = f["format_note"].as_str().unwrap_or("");
        let description = format!("{} mp4 {} {}", format_id, resolution, note)
            .trim()
            .to_string();

        out.push(FormatDescriptor {
            format_id: format_id.to_string(),
            quality: format!("{}p", height),
            description,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_formats_filters_and_maps() {
        let dump = json!({
            "formats": [
                { "format_id": "137", "ext": "mp4", "width": 1920, "height": 1080,
                  "resolution": "1920x1080", "format_note": "1080p" },
                { "format_id": "136", "ext": "mp4", "width": 1280, "height": 720,
                  "resolution": "1280x720", "format_note": "720p" },
                { "format_id": "248", "ext": "webm", "width": 1920, "height": 1080 },
                { "format_id": "140", "ext": "m4a", "format_note": "audio only" },
                { "format_id": "sb0", "ext": "mp4", "height": 27 },
            ]
        });
        let formats = parse_formats(&dump).unwrap();
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].format_id, "137");
        assert_eq!(formats[0].quality, "1080p");
        assert_eq!(formats[1].quality, "720p");
    }

    #[test]
    fn test_parse_formats_requires_array() {
        let err = parse_formats(&json!({ "title": "no formats" })).unwrap_err();
        assert!(matches!(err, DownloadError::ParseError(_)));
    }

    #[test]
    fn test_shared_rank_applies_to_json_mode() {
        let dump = json!({
            "formats": [
                { "format_id": "134", "ext": "mp4", "height": 360 },
                { "format_id": "137", "ext": "mp4", "height": 1080 },
                { "format_id": "18",  "ext": "mp4", "height": 360 },
            ]
        });
        let formats = dedupe_and_rank(parse_formats(&dump).unwrap());
        assert_eq!(formats.len(), 2);
        assert_eq!(formats[0].quality, "1080p");
        assert_eq!(formats[1].format_id, "134"); // first 360p entry wins
    }
}
