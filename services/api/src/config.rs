//! Server configuration from the environment

use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    pub port: u16,
    /// Directory uploaded media is written to and served from
    pub upload_dir: PathBuf,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORT`: HTTP port (default: 8001)
    /// - `UPLOAD_DIR`: media directory (default: ./uploads)
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origin list
    ///   (default: http://localhost:3000)
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8001);

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            port,
            upload_dir,
            cors_origins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ServerConfig::from_env();
        assert!(config.port > 0);
        assert!(!config.cors_origins.is_empty());
    }
}
