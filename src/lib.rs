pub mod config;
pub mod downloader;
pub mod server;

pub use config::ServerConfig;
pub use server::{build_app, AppState};
