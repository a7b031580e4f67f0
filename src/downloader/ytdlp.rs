// yt-dlp wrapper: binary discovery, argument building, invocation

use tracing::{debug, warn};

use crate::downloader::errors::DownloadError;
use crate::downloader::extractors::diagnose_error;
use crate::downloader::format_selector::FormatSelector;
use crate::downloader::models::MediaFormat;
use crate::downloader::tools::{ToolKind, ToolManager};
use crate::downloader::utils::run_output_with_timeout;

/// Hard deadline for a listing invocation, seconds
pub const LISTING_TIMEOUT_SECS: u64 = 30;

/// Hard deadline for a download invocation, seconds
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct YtDlp {
    path: String,
}

impl YtDlp {
    pub fn new() -> Self {
        Self {
            path: ToolManager::new().resolve(ToolKind::YtDlp),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Arguments for the human-readable format table (`-F`).
    fn listing_args(url: &str) -> Vec<String> {
        vec![
            "--extractor-args".to_string(),
            "youtube:player_client=android,web".to_string(),
            "--extractor-args".to_string(),
            "youtube:skip=translated_subs".to_string(),
            "--no-check-certificates".to_string(),
            "-F".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    /// Arguments for the machine-readable info dump (`-J`).
    fn dump_json_args(url: &str) -> Vec<String> {
        vec![
            "--extractor-args".to_string(),
            "youtube:player_client=android,web".to_string(),
            "--extractor-args".to_string(),
            "youtube:skip=translated_subs".to_string(),
            "--no-check-certificates".to_string(),
            "-J".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    /// Arguments for a download into `output_template`.
    pub fn download_args(
        url: &str,
        format: MediaFormat,
        quality: &str,
        output_template: &str,
    ) -> Vec<String> {
        match format {
            MediaFormat::Mp3 => vec![
                "--extractor-args".to_string(),
                "youtube:player_client=android".to_string(),
                "--no-check-certificates".to_string(),
                "-x".to_string(),
                "--audio-format".to_string(),
                "mp3".to_string(),
                "--audio-quality".to_string(),
                "0".to_string(), // the tool's "0" = best audio quality
                "-o".to_string(),
                output_template.to_string(),
                url.to_string(),
            ],
            MediaFormat::Mp4 => vec![
                "--extractor-args".to_string(),
                "youtube:player_client=android".to_string(),
                "--no-check-certificates".to_string(),
                "--format".to_string(),
                FormatSelector::video_spec(quality),
                "--merge-output-format".to_string(),
                "mp4".to_string(),
                "-o".to_string(),
                output_template.to_string(),
                url.to_string(),
            ],
        }
    }

    /// Run the format table listing. The historical behavior parses stdout
    /// regardless of the exit status, so a non-zero exit only logs.
    pub async fn list_formats_text(
        &self,
        url: &str,
        timeout_secs: u64,
    ) -> Result<String, DownloadError> {
        let args = Self::listing_args(url);
        let output = run_output_with_timeout(&self.path, &args, timeout_secs).await?;
        if !output.status.success() {
            warn!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "format listing exited non-zero, parsing stdout anyway"
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run the structured info dump and parse its JSON document.
    pub async fn dump_json(
        &self,
        url: &str,
        timeout_secs: u64,
    ) -> Result<serde_json::Value, DownloadError> {
        let args = Self::dump_json_args(url);
        let output = run_output_with_timeout(&self.path, &args, timeout_secs).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(DownloadError::ToolFailed(stderr));
        }
        serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Run a download. stdout/stderr are logged server-side only; callers
    /// never see the tool's own chatter.
    pub async fn download(
        &self,
        url: &str,
        format: MediaFormat,
        quality: &str,
        output_template: &str,
        timeout_secs: u64,
    ) -> Result<(), DownloadError> {
        let args = Self::download_args(url, format, quality, output_template);
        let output = run_output_with_timeout(&self.path, &args, timeout_secs).await?;

        debug!(
            stdout = %String::from_utf8_lossy(&output.stdout),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "fetch tool finished"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if let Some(reason) = diagnose_error(&stderr) {
                warn!(reason = reason.description(), "fetch tool blocked");
            }
            return Err(DownloadError::ToolFailed(stderr));
        }

        Ok(())
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_args() {
        let args = YtDlp::listing_args("https://example.com/v");
        assert!(args.contains(&"-F".to_string()));
        assert!(args.contains(&"--no-warnings".to_string()));
        assert!(args.contains(&"youtube:player_client=android,web".to_string()));
        assert!(args.contains(&"youtube:skip=translated_subs".to_string()));
        assert_eq!(args.last().unwrap(), "https://example.com/v");
    }

    #[test]
    fn test_mp3_download_args() {
        let args = YtDlp::download_args(
            "https://example.com/v",
            MediaFormat::Mp3,
            "best",
            "/tmp/stage/%(title)s.%(ext)s",
        );
        assert!(args.contains(&"-x".to_string()));
        let pos = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[pos + 1], "mp3");
        let pos = args.iter().position(|a| a == "--audio-quality").unwrap();
        assert_eq!(args[pos + 1], "0");
        assert!(!args.contains(&"--merge-output-format".to_string()));
    }

    #[test]
    fn test_mp4_download_args_best() {
        let args = YtDlp::download_args(
            "https://example.com/v",
            MediaFormat::Mp4,
            "best",
            "/tmp/stage/%(title)s.%(ext)s",
        );
        let pos = args.iter().position(|a| a == "--format").unwrap();
        assert_eq!(args[pos + 1], "bv*+ba/b");
        let pos = args.iter().position(|a| a == "--merge-output-format").unwrap();
        assert_eq!(args[pos + 1], "mp4");
    }

    #[test]
    fn test_mp4_download_args_bounded() {
        let args = YtDlp::download_args(
            "https://example.com/v",
            MediaFormat::Mp4,
            "480",
            "/tmp/stage/%(title)s.%(ext)s",
        );
        let pos = args.iter().position(|a| a == "--format").unwrap();
        assert_eq!(args[pos + 1], "bv*[height<=480]+ba/b[height<=480]");
    }

    #[test]
    fn test_output_template_passes_through() {
        let args = YtDlp::download_args(
            "https://example.com/v",
            MediaFormat::Mp4,
            "best",
            "/tmp/stage/%(title)s.%(ext)s",
        );
        let pos = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[pos + 1], "/tmp/stage/%(title)s.%(ext)s");
    }
}
