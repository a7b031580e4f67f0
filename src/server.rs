// HTTP surface - router assembly and request handlers
//
// Every reply travels as a transport-success JSON body whose `status` field
// carries the outcome; errors are mapped at the outer edge of each handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::downloader::ytdlp::DOWNLOAD_TIMEOUT_SECS;
use crate::downloader::{
    DownloadDebug, DownloadError, DownloadReply, FfProbe, FormatDiscovery, FormatsReply,
    ListingConfig, MediaFormat, ToolManager, Workspace, YtDlp,
};

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Workspace>,
    pub ytdlp: YtDlp,
    pub ffprobe: FfProbe,
    pub discovery: Arc<FormatDiscovery>,
}

impl AppState {
    pub fn new(workspace: Workspace) -> Self {
        let ytdlp = YtDlp::new();
        Self {
            workspace: Arc::new(workspace),
            discovery: Arc::new(FormatDiscovery::new(ytdlp.clone())),
            ytdlp,
            ffprobe: FfProbe::new(),
        }
    }
}

/// Build the application router (shared between startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/file", get(file_handler))
        .route("/formats", get(formats_handler))
        .route("/download", get(download_handler))
        .route("/tools", get(tools_handler))
        .layer(cors)
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "YouTube Downloader Backend is Running!",
    }))
}

#[derive(Debug, Deserialize)]
struct FileParams {
    filename: String,
}

async fn file_handler(
    State(state): State<AppState>,
    Query(params): Query<FileParams>,
) -> Response {
    let not_found = || {
        Json(serde_json::json!({
            "status": "error",
            "message": "File not found",
        }))
        .into_response()
    };

    let Some(path) = state.workspace.resolve_serve_file(&params.filename) else {
        return not_found();
    };

    match tokio::fs::File::open(&path).await {
        Ok(file) => {
            let headers = [
                (
                    header::CONTENT_TYPE,
                    "application/octet-stream".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", params.filename),
                ),
            ];
            (headers, Body::from_stream(ReaderStream::new(file))).into_response()
        }
        Err(e) => {
            warn!(filename = %params.filename, error = %e, "failed to open served file");
            not_found()
        }
    }
}

#[derive(Debug, Deserialize)]
struct FormatsParams {
    url: String,
}

async fn formats_handler(
    State(state): State<AppState>,
    Query(params): Query<FormatsParams>,
) -> Json<FormatsReply> {
    let config = ListingConfig::default();
    match state.discovery.list(&params.url, &config).await {
        Ok(formats) => Json(FormatsReply::Success { formats }),
        Err(DownloadError::Timeout) => Json(FormatsReply::Error {
            message: "Request timeout".to_string(),
        }),
        Err(e) => Json(FormatsReply::Error {
            message: e.to_string(),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct DownloadParams {
    url: String,
    format: Option<String>,
    quality: Option<String>,
}

async fn download_handler(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Json<DownloadReply> {
    let format = MediaFormat::parse(params.format.as_deref().unwrap_or("mp4"));
    let quality = params.quality.unwrap_or_else(|| "best".to_string());

    match run_download(&state, &params.url, format, &quality).await {
        Ok(reply) => Json(reply),
        Err(err) => {
            warn!(url = %params.url, format = format.as_str(), error = %err, "download failed");
            Json(DownloadReply::Error {
                message: download_error_message(&err),
            })
        }
    }
}

/// The whole download flow. Errors bubble here and are mapped to the
/// caller-facing message in `download_handler`.
async fn run_download(
    state: &AppState,
    url: &str,
    format: MediaFormat,
    quality: &str,
) -> Result<DownloadReply, DownloadError> {
    let staging = state
        .workspace
        .begin_staging()
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to stage download: {}", e)))?;

    state
        .ytdlp
        .download(
            url,
            format,
            quality,
            &staging.output_template(),
            DOWNLOAD_TIMEOUT_SECS,
        )
        .await?;

    let Some(file) = staging.newest_file() else {
        return Ok(DownloadReply::Error {
            message: "No file downloaded".to_string(),
        });
    };

    let report = state.ffprobe.probe(&file).await?;

    let filename = state
        .workspace
        .publish(&file)
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to publish file: {}", e)))?;
    info!(%filename, "download completed");

    Ok(DownloadReply::Success {
        message: "Download completed!".to_string(),
        filename,
        debug: DownloadDebug {
            has_video: report.has_video,
            has_audio: report.has_audio,
            requested_quality: quality.to_string(),
            actual_quality: report.actual_quality,
            streams: report.streams,
        },
    })
}

/// Caller-facing message for a failed download. Detailed diagnostics only
/// reach the server-side logs.
fn download_error_message(err: &DownloadError) -> String {
    match err {
        DownloadError::Timeout => "Download timeout".to_string(),
        _ => "Download failed. YouTube may have blocked this video.".to_string(),
    }
}

async fn tools_handler() -> impl IntoResponse {
    Json(ToolManager::new().all_statuses())
}
