//! API configuration.

use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory uploaded videos are saved into
    pub upload_dir: PathBuf,
    /// Process every Nth decoded frame
    pub frame_stride: u64,
    /// Path to the detector ONNX model; absent means stub detector
    pub model_path: Option<String>,
    /// Detection confidence threshold
    pub confidence_threshold: f32,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size (bounds video uploads)
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            frame_stride: 15,
            model_path: None,
            confidence_threshold: 0.7,
            cors_origins: vec!["*".to_string()],
            max_body_size: 200 * 1024 * 1024, // 200MB
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("FOOTFALL_HOST").unwrap_or(defaults.host),
            port: std::env::var("FOOTFALL_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            upload_dir: std::env::var("FOOTFALL_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            frame_stride: std::env::var("FOOTFALL_FRAME_STRIDE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.frame_stride),
            model_path: std::env::var("FOOTFALL_MODEL_PATH").ok(),
            confidence_threshold: std::env::var("FOOTFALL_CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.confidence_threshold),
            cors_origins: std::env::var("FOOTFALL_CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("FOOTFALL_MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.frame_stride, 15);
        assert!((config.confidence_threshold - 0.7).abs() < 1e-6);
        assert_eq!(config.port, 5000);
        assert!(!config.is_production());
    }
}
