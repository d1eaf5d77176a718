//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To point at a different model artifact, only edit this file
//! (or set the ECOSORT_* environment variables).

use std::path::PathBuf;

/// Default remote identifier for the trained classifier artifact.
///
/// This is the fallback URL when no environment variable is set.
/// The artifact is the VGG16 waste classifier exported to ONNX.
pub const DEFAULT_MODEL_URL: &str =
    "https://storage.googleapis.com/ecosort-models/model_sampah_vgg16.onnx";

/// File name of the cached artifact on disk
pub const MODEL_FILE_NAME: &str = "model_sampah_vgg16.onnx";

/// Minimum acceptable artifact size in bytes.
///
/// A cached file below this is treated as a corrupt or partial
/// previous download and re-fetched.
pub const MIN_MODEL_SIZE_BYTES: u64 = 100_000_000;

/// Download timeout (seconds)
pub const DEFAULT_DOWNLOAD_TIMEOUT: u64 = 300;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "EcoSort";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact URL from environment or use default
pub fn get_model_url() -> String {
    std::env::var("ECOSORT_MODEL_URL").unwrap_or_else(|_| DEFAULT_MODEL_URL.to_string())
}

/// Get local artifact path from environment or use the per-user data dir
pub fn get_model_path() -> PathBuf {
    if let Ok(path) = std::env::var("ECOSORT_MODEL_PATH") {
        return PathBuf::from(path);
    }

    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(MODEL_FILE_NAME)
}

/// Get minimum artifact size from environment or use default
pub fn get_min_model_size() -> u64 {
    std::env::var("ECOSORT_MODEL_MIN_BYTES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(MIN_MODEL_SIZE_BYTES)
}

/// Get download timeout from environment or use default
pub fn get_download_timeout() -> u64 {
    std::env::var("ECOSORT_DOWNLOAD_TIMEOUT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT)
}

/// Expected SHA-256 digest of the artifact, if pinned
pub fn get_expected_checksum() -> Option<String> {
    std::env::var("ECOSORT_MODEL_SHA256")
        .ok()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty())
}
