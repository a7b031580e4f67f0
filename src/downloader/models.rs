// Common data models for the backend

use serde::{Deserialize, Serialize};

/// Output container requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp3,
    Mp4,
}

impl MediaFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
        }
    }

    /// Parse the query parameter; anything other than "mp3" falls back to
    /// the mp4 default.
    pub fn parse(s: &str) -> Self {
        match s {
            "mp3" => Self::Mp3,
            _ => Self::Mp4,
        }
    }
}

/// One selectable encoding variant reported by the fetch tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    /// Opaque format token, e.g. "137"
    pub format_id: String,
    /// Quality label, e.g. "720p"
    pub quality: String,
    /// Raw description line the descriptor came from
    pub description: String,
}

impl FormatDescriptor {
    /// Numeric value of the quality label ("720p" -> 720). Labels that do
    /// not parse rank lowest.
    pub fn quality_height(&self) -> u32 {
        self.quality.trim_end_matches('p').parse().unwrap_or(0)
    }
}

/// Stream layout reported by the probe tool for a downloaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamReport {
    pub has_video: bool,
    pub has_audio: bool,
    /// "1080p" derived from the first video stream's height, or "unknown"
    pub actual_quality: String,
    /// Raw csv lines, one per stream
    pub streams: Vec<String>,
}

/// Diagnostic block attached to a successful download reply
#[derive(Debug, Clone, Serialize)]
pub struct DownloadDebug {
    pub has_video: bool,
    pub has_audio: bool,
    pub requested_quality: String,
    pub actual_quality: String,
    pub streams: Vec<String>,
}

/// Reply body for the formats endpoint. The transport status is always
/// success; callers inspect the `status` field.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FormatsReply {
    Success { formats: Vec<FormatDescriptor> },
    Error { message: String },
}

/// Reply body for the download endpoint
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadReply {
    Success {
        message: String,
        filename: String,
        debug: DownloadDebug,
    },
    Error {
        message: String,
    },
}
