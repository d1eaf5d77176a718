//! EcoSort Core - Waste Image Classification
//!
//! Takes raw image bytes, runs the pretrained waste classifier and
//! returns a category, a confidence and static disposal guidance.
//! The model artifact is fetched from remote storage on first use and
//! cached for the process lifetime.
//!
//! Typical call chain:
//!
//! ```no_run
//! use ecosort_core::logic::{advice, model};
//!
//! # fn run(image_bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let handle = model::get_model()?;
//! let prediction = model::predict(image_bytes, handle)?;
//! let tips = advice::get_advice(prediction.label);
//! println!("{} ({:.1}%): {}", prediction.label, prediction.confidence, tips.body);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod logic;

pub use logic::advice::{advice_colors, get_advice, lighten_color, AdviceColors, AdviceRecord};
pub use logic::labels::WasteLabel;
pub use logic::model::{
    get_model, predict, Classifier, EngineStatus, InferenceError, ModelError, ModelHandle,
    Prediction,
};
