//! Model Module - Provider & Inference Engine
//!
//! provider: download-if-missing artifact, one-time cached load.
//! inference: image preprocessing, forward pass, result mapping.

pub mod inference;
pub mod provider;

// Re-export common types
pub use inference::{engine_status, predict, Classifier, EngineStatus, InferenceError, Prediction};
pub use provider::{get_model, ModelError, ModelHandle, ModelMetadata};
