// Runtime configuration from environment variables

use std::env;
use std::path::PathBuf;

/// Server configuration. Every field has a coded default and an env-var
/// override: YTDL_BACKEND_BIND, YTDL_BACKEND_PORT, YTDL_BACKEND_SCRATCH_DIR.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub scratch_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            scratch_dir: default_scratch_dir(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(bind) = env::var("YTDL_BACKEND_BIND") {
            config.bind = bind;
        }
        if let Ok(port) = env::var("YTDL_BACKEND_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(dir) = env::var("YTDL_BACKEND_SCRATCH_DIR") {
            config.scratch_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn default_scratch_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("ytdl-backend")
}
