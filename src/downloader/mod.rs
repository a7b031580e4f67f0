// Downloader module - external tool integration

pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod probe;
pub mod tools;
pub mod utils;
pub mod workspace;
pub mod ytdlp;

pub use errors::DownloadError;
pub use extractors::{FormatDiscovery, ListingConfig};
pub use models::{DownloadDebug, DownloadReply, FormatDescriptor, FormatsReply, MediaFormat, StreamReport};
pub use probe::FfProbe;
pub use tools::{ToolKind, ToolManager, ToolStatus};
pub use workspace::Workspace;
pub use ytdlp::YtDlp;
