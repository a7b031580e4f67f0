// ffprobe wrapper - per-stream codec type and dimensions

use std::path::Path;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::StreamReport;
use crate::downloader::tools::{ToolKind, ToolManager};
use crate::downloader::utils::run_output;

#[derive(Debug, Clone)]
pub struct FfProbe {
    path: String,
}

impl FfProbe {
    pub fn new() -> Self {
        Self {
            path: ToolManager::new().resolve(ToolKind::FfProbe),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Probe a local file. The invocation has no deadline; ffprobe on a
    /// local file returns promptly. Exit status is ignored - an empty
    /// stdout simply reports no streams.
    pub async fn probe(&self, file: &Path) -> Result<StreamReport, DownloadError> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-show_entries".to_string(),
            "stream=codec_type,width,height".to_string(),
            "-of".to_string(),
            "csv=p=0".to_string(),
            file.display().to_string(),
        ];
        let output = run_output(&self.path, &args).await?;
        Ok(parse_streams(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for FfProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse csv probe lines into the stream report. The actual quality comes
/// from the first video line with at least three fields; the third field is
/// the height.
pub fn parse_streams(stdout: &str) -> StreamReport {
    let streams: Vec<String> = stdout.trim().split('\n').map(|s| s.to_string()).collect();

    let has_video = streams.iter().any(|s| s.contains("video"));
    let has_audio = streams.iter().any(|s| s.contains("audio"));

    let mut actual_quality = "unknown".to_string();
    for stream in &streams {
        if stream.contains("video") {
            let parts: Vec<&str> = stream.split(',').collect();
            if parts.len() >= 3 {
                actual_quality = format!("{}p", parts[2]);
                break;
            }
        }
    }

    StreamReport {
        has_video,
        has_audio,
        actual_quality,
        streams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_line_yields_quality() {
        let report = parse_streams("video,1920,1080\naudio\n");
        assert!(report.has_video);
        assert!(report.has_audio);
        assert_eq!(report.actual_quality, "1080p");
        assert_eq!(report.streams.len(), 2);
    }

    #[test]
    fn test_audio_only_file() {
        let report = parse_streams("audio\n");
        assert!(!report.has_video);
        assert!(report.has_audio);
        assert_eq!(report.actual_quality, "unknown");
    }

    #[test]
    fn test_short_video_line_keeps_scanning() {
        // A video line without dimensions does not settle the quality; a
        // later complete line does.
        let report = parse_streams("video\nvideo,1280,720\n");
        assert!(report.has_video);
        assert_eq!(report.actual_quality, "720p");
    }

    #[test]
    fn test_empty_probe_output() {
        let report = parse_streams("");
        assert!(!report.has_video);
        assert!(!report.has_audio);
        assert_eq!(report.actual_quality, "unknown");
        assert_eq!(report.streams, vec![String::new()]);
    }
}
