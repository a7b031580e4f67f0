// Error types for external tool invocations

use std::fmt;

#[derive(Debug, Clone)]
pub enum DownloadError {
    /// External tool exceeded its allotted time
    Timeout,

    /// yt-dlp or ffprobe not found on this system
    ToolNotFound(String),

    /// Tool ran but exited non-zero; payload is the captured stderr
    ToolFailed(String),

    /// Failed to parse tool output
    ParseError(String),

    /// Command could not be spawned or awaited
    ExecutionError(String),

    /// Unknown error with details
    Unknown(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Operation timed out"),
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::ToolFailed(stderr) => write!(f, "Tool failed: {}", stderr),
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::ExecutionError(msg) => write!(f, "Execution error: {}", msg),
            Self::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

// Convert from String for backward compatibility
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        // Smart detection of error types

        if s.contains("timeout") || s.contains("timed out") || s.contains("Timed out") {
            return Self::Timeout;
        }

        // Tool not found
        if s.contains("not found") || s.contains("No such file") || s.contains("command not found") {
            return Self::ToolNotFound(s);
        }

        // Parse errors
        if s.contains("parse") || s.contains("JSON") || s.contains("Invalid JSON") {
            return Self::ParseError(s);
        }

        // Everything else
        Self::Unknown(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        let err = DownloadError::from("Timed out after 30s".to_string());
        assert!(matches!(err, DownloadError::Timeout));
    }

    #[test]
    fn test_tool_not_found_classification() {
        let err = DownloadError::from("yt-dlp: command not found".to_string());
        assert!(matches!(err, DownloadError::ToolNotFound(_)));
    }

    #[test]
    fn test_unknown_classification() {
        let err = DownloadError::from("something else went wrong".to_string());
        assert!(matches!(err, DownloadError::Unknown(_)));
    }
}
