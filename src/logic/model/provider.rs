//! Model Provider - Artifact Fetch & One-Time Load
//!
//! Ensures a usable trained model exists locally (download-if-missing,
//! discard-if-undersized), loads it into an ONNX Runtime session once
//! and caches the handle for the remainder of the process.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use ort::session::{builder::GraphOptimizationLevel, Session};
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::constants;
use crate::logic::labels::CLASS_COUNT;

use super::inference::INPUT_SIZE;

// ============================================================================
// STATE
// ============================================================================

/// Process-wide model handle, written exactly once on first access
static MODEL: OnceCell<ModelHandle> = OnceCell::new();

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub artifact_path: String,
    pub input_size: u32,
    pub class_count: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Loaded, ready-to-run classifier.
///
/// The session sits behind a mutex because ONNX Runtime needs `&mut`
/// to run; the handle itself is immutable after creation.
pub struct ModelHandle {
    pub(crate) session: Mutex<Session>,
    metadata: ModelMetadata,
}

impl ModelHandle {
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// What to do about the cached artifact on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactAction {
    /// Valid file present, load it
    UseCached,
    /// Missing or discarded, download it
    Fetch,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Fatal model acquisition/load failures.
///
/// None of these are retried: the caller reports and the process does
/// not proceed to serve inference.
#[derive(Debug)]
pub enum ModelError {
    Download(String),
    Io(String),
    TooSmall { actual: u64, minimum: u64 },
    ChecksumMismatch { expected: String, actual: String },
    Load(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Download(e) => write!(f, "Model download failed: {}", e),
            Self::Io(e) => write!(f, "Model file I/O failed: {}", e),
            Self::TooSmall { actual, minimum } => write!(
                f,
                "Downloaded artifact is {} bytes, below the {} byte minimum",
                actual, minimum
            ),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "Artifact checksum mismatch: expected {}, got {}",
                expected, actual
            ),
            Self::Load(e) => write!(f, "Model load failed: {}", e),
        }
    }
}

impl std::error::Error for ModelError {}

// ============================================================================
// ARTIFACT ACQUISITION
// ============================================================================

/// Decide whether the cached artifact can be used.
///
/// A file below `min_size` is a corrupt or partial previous download;
/// it is deleted here so the caller re-fetches.
pub fn plan_artifact(path: &Path, min_size: u64) -> Result<ArtifactAction, ModelError> {
    if path.exists() {
        let size = fs::metadata(path).map_err(|e| ModelError::Io(e.to_string()))?.len();

        if size >= min_size {
            return Ok(ArtifactAction::UseCached);
        }

        log::warn!(
            "Cached model at {} is only {} bytes (minimum {}), discarding",
            path.display(),
            size,
            min_size
        );
        fs::remove_file(path).map_err(|e| ModelError::Io(e.to_string()))?;
    }

    Ok(ArtifactAction::Fetch)
}

/// Download the artifact into place, streaming via a .part file
fn download_artifact(url: &str, dest: &Path) -> Result<(), ModelError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| ModelError::Io(e.to_string()))?;
    }

    let response = ureq::get(url)
        .timeout(Duration::from_secs(constants::get_download_timeout()))
        .call()
        .map_err(|e| ModelError::Download(e.to_string()))?;

    let part_path = dest.with_extension("part");
    let mut file = File::create(&part_path).map_err(|e| ModelError::Io(e.to_string()))?;

    let written = io::copy(&mut response.into_reader(), &mut file)
        .map_err(|e| ModelError::Download(e.to_string()))?;

    fs::rename(&part_path, dest).map_err(|e| ModelError::Io(e.to_string()))?;

    log::info!("Downloaded {} bytes to {}", written, dest.display());
    Ok(())
}

/// Ensure a valid artifact exists locally, returning its path.
///
/// Undersized cached files are discarded and re-fetched; a fetched file
/// still below the size floor counts as a failed download.
pub fn ensure_artifact() -> Result<PathBuf, ModelError> {
    let path = constants::get_model_path();
    let min_size = constants::get_min_model_size();

    if plan_artifact(&path, min_size)? == ArtifactAction::Fetch {
        let url = constants::get_model_url();
        log::info!("Fetching model from {} into {}", url, path.display());
        download_artifact(&url, &path)?;

        let size = fs::metadata(&path).map_err(|e| ModelError::Io(e.to_string()))?.len();
        if size < min_size {
            let _ = fs::remove_file(&path);
            return Err(ModelError::TooSmall {
                actual: size,
                minimum: min_size,
            });
        }
    }

    if let Some(expected) = constants::get_expected_checksum() {
        let actual = sha256_file(&path)?;
        if actual != expected {
            return Err(ModelError::ChecksumMismatch { expected, actual });
        }
        log::info!("Artifact checksum verified: {}", actual);
    }

    Ok(path)
}

// ============================================================================
// MODEL LOADING
// ============================================================================

fn load_session(path: &Path) -> Result<Session, ModelError> {
    Session::builder()
        .map_err(|e| ModelError::Load(format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| ModelError::Load(format!("Failed to set optimization: {}", e)))?
        .commit_from_file(path)
        .map_err(|e| ModelError::Load(format!("Failed to load model: {}", e)))
}

/// Get the process-wide model handle, fetching and loading on first call.
///
/// Idempotent and safe to call repeatedly; every call after the first
/// returns the cached handle.
pub fn get_model() -> Result<&'static ModelHandle, ModelError> {
    MODEL.get_or_try_init(|| {
        let path = ensure_artifact()?;

        log::info!("Loading ONNX model from: {}", path.display());
        let session = load_session(&path)?;
        log::info!("ONNX model loaded successfully");

        Ok(ModelHandle {
            session: Mutex::new(session),
            metadata: ModelMetadata {
                artifact_path: path.display().to_string(),
                input_size: INPUT_SIZE,
                class_count: CLASS_COUNT,
                loaded_at: Utc::now(),
            },
        })
    })
}

/// Check if the model has been loaded
pub fn is_model_loaded() -> bool {
    MODEL.get().is_some()
}

/// Metadata of the loaded model, if any
pub fn metadata() -> Option<ModelMetadata> {
    MODEL.get().map(|h| h.metadata.clone())
}

// ============================================================================
// INTEGRITY
// ============================================================================

/// SHA-256 digest of the cached artifact (hex)
pub fn artifact_checksum() -> Result<String, ModelError> {
    sha256_file(&constants::get_model_path())
}

fn sha256_file(path: &Path) -> Result<String, ModelError> {
    let mut file = File::open(path).map_err(|e| ModelError::Io(e.to_string()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = file.read(&mut buf).map_err(|e| ModelError::Io(e.to_string()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_plans_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");

        assert_eq!(plan_artifact(&path, 1000).unwrap(), ArtifactAction::Fetch);
    }

    #[test]
    fn test_empty_artifact_is_discarded_and_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        fs::write(&path, b"").unwrap();

        assert_eq!(plan_artifact(&path, 1000).unwrap(), ArtifactAction::Fetch);
        assert!(!path.exists(), "undersized file should be deleted");
    }

    #[test]
    fn test_undersized_artifact_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        fs::write(&path, vec![0u8; 999]).unwrap();

        assert_eq!(plan_artifact(&path, 1000).unwrap(), ArtifactAction::Fetch);
        assert!(!path.exists());
    }

    #[test]
    fn test_valid_artifact_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        fs::write(&path, vec![0u8; 1000]).unwrap();

        assert_eq!(plan_artifact(&path, 1000).unwrap(), ArtifactAction::UseCached);
        assert!(path.exists());
    }

    #[test]
    fn test_sha256_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"hello world").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
