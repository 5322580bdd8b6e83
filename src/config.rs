use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// field has a default so a bare `palisade serve` works once the model is
/// downloaded.
pub struct Config {
    /// Address the HTTP server binds to (PALISADE_BIND, default 0.0.0.0)
    pub bind: String,
    /// Port the HTTP server listens on (PALISADE_PORT, default 8080)
    pub port: u16,
    /// Directory containing the ONNX model files (PALISADE_MODEL_DIR)
    pub model_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let port = match env::var("PALISADE_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PALISADE_PORT is not a valid port: {raw}"))?,
            Err(_) => 8080,
        };

        let model_dir = env::var("PALISADE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::classifier::download::default_model_dir());

        Ok(Self {
            bind: env::var("PALISADE_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            model_dir,
        })
    }

    /// Check that the model files are in place.
    /// Call this before loading the classifier so startup fails with a
    /// remediation hint instead of a bare file-not-found.
    pub fn require_model(&self) -> Result<()> {
        if !crate::classifier::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "ONNX model files not found in {}\n\
                 Run `palisade download-model` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }
}
