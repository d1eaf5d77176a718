//! Inference - Image Preprocessing & Forward Pass
//!
//! Normalizes arbitrary input images into the tensor shape the
//! classifier was trained on, runs one forward pass and maps the
//! output to a label + confidence.

use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array4;
use ort::value::Value;
use serde::Serialize;

use crate::logic::labels::WasteLabel;

use super::provider::ModelHandle;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Spatial input resolution the classifier was trained on
pub const INPUT_SIZE: u32 = 224;

/// Input channels (RGB)
pub const CHANNELS: usize = 3;

// ============================================================================
// STATE
// ============================================================================

/// Latency stats
static LATENCY_SUM: AtomicU64 = AtomicU64::new(0);
static INFERENCE_COUNT: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Classification result for one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: WasteLabel,
    /// Classifier probability for the chosen label, in percent
    pub confidence: f32,
    pub inference_time_us: u64,
}

/// Engine status for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum InferenceError {
    /// Input bytes cannot be decoded as an image. Recoverable: the
    /// caller shows a warning and takes no further action.
    InvalidImage(String),
    Session(String),
    Tensor(String),
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImage(e) => write!(f, "Invalid image: {}", e),
            Self::Session(e) => write!(f, "Inference session error: {}", e),
            Self::Tensor(e) => write!(f, "Tensor error: {}", e),
        }
    }
}

impl std::error::Error for InferenceError {}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Seam between preprocessing/result mapping and the model backend.
///
/// The real backend is the ONNX session in [`ModelHandle`]; tests
/// substitute fixed score vectors.
pub trait Classifier {
    /// One forward pass over a `(1, 224, 224, 3)` input, returning one
    /// probability-like score per class.
    fn class_scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

impl Classifier for ModelHandle {
    fn class_scores(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let mut session = self.session.lock();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Session("Model defines no output".to_string()))?;

        let input_tensor = Value::from_array(input.clone())
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Session(e.to_string()))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError::Session("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Tensor(e.to_string()))?;

        Ok(output_tensor.1.to_vec())
    }
}

// ============================================================================
// PREPROCESSING
// ============================================================================

/// Decode, resize and normalize image bytes into the model input.
///
/// Any decodable image yields exactly a `(1, 224, 224, 3)` tensor:
/// alpha is dropped, grayscale is expanded to three channels, and
/// 8-bit channel values are scaled to [0, 1] by dividing by 255. No
/// mean subtraction; this must match the training normalization.
pub fn preprocess(image_bytes: &[u8]) -> Result<Array4<f32>, InferenceError> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| InferenceError::InvalidImage(e.to_string()))?;

    let resized = img.resize_exact(INPUT_SIZE, INPUT_SIZE, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    // Raw buffer is row-major with interleaved channels, i.e. NHWC order
    let side = INPUT_SIZE as usize;
    let pixels: Vec<f32> = rgb.into_raw().into_iter().map(|c| c as f32 / 255.0).collect();

    Array4::from_shape_vec((1, side, side, CHANNELS), pixels)
        .map_err(|e| InferenceError::Tensor(e.to_string()))
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Classify one image.
///
/// Runs the full pass every call; nothing is cached per image. The
/// winning class is the stable argmax of the scores (first maximum
/// wins on ties); an index outside the label set maps to
/// `WasteLabel::Unknown` rather than failing.
pub fn predict<C: Classifier>(image_bytes: &[u8], model: &C) -> Result<Prediction, InferenceError> {
    let start_time = std::time::Instant::now();

    let input = preprocess(image_bytes)?;
    let scores = model.class_scores(&input)?;

    let (index, score) = argmax(&scores)
        .ok_or_else(|| InferenceError::Session("Model produced no scores".to_string()))?;

    let label = WasteLabel::from_index(index);
    if label == WasteLabel::Unknown {
        log::warn!("Model returned class index {} outside the known label set", index);
    }

    let inference_time = start_time.elapsed().as_micros() as u64;

    // Track metrics
    LATENCY_SUM.fetch_add(inference_time, Ordering::Relaxed);
    INFERENCE_COUNT.fetch_add(1, Ordering::Relaxed);

    Ok(Prediction {
        label,
        confidence: score * 100.0,
        inference_time_us: inference_time,
    })
}

/// Stable argmax: index of the first occurrence of the maximum
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }

    best
}

// ============================================================================
// STATUS
// ============================================================================

pub fn engine_status() -> EngineStatus {
    let loaded = super::provider::is_model_loaded();
    let name = super::provider::metadata()
        .map(|meta| meta.artifact_path)
        .unwrap_or_else(|| "None".to_string());

    let sum = LATENCY_SUM.load(Ordering::Relaxed);
    let count = INFERENCE_COUNT.load(Ordering::Relaxed);
    let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

    EngineStatus {
        model_loaded: loaded,
        model_name: name,
        inference_device: "ONNX Runtime (CPU)".to_string(),
        avg_latency_ms: avg,
        inference_count: count,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::labels::{ALL_LABELS, CLASS_COUNT};
    use image::{DynamicImage, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Classifier stub returning a fixed score vector
    struct StubClassifier(Vec<f32>);

    impl Classifier for StubClassifier {
        fn class_scores(&self, _input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn black_rgb_png(width: u32, height: u32) -> Vec<u8> {
        png_bytes(DynamicImage::ImageRgb8(RgbImage::new(width, height)))
    }

    #[test]
    fn test_one_hot_scores_map_to_each_label() {
        let bytes = black_rgb_png(10, 10);

        for (i, expected) in ALL_LABELS.iter().enumerate() {
            let mut scores = vec![0.0; CLASS_COUNT];
            scores[i] = 1.0;

            let prediction = predict(&bytes, &StubClassifier(scores)).unwrap();
            assert_eq!(prediction.label, *expected);
            assert!((prediction.confidence - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_black_image_with_fixed_scores_yields_organic() {
        let bytes = black_rgb_png(10, 10);
        let stub = StubClassifier(vec![0.1, 0.1, 0.1, 0.7]);

        let prediction = predict(&bytes, &stub).unwrap();
        assert_eq!(prediction.label, WasteLabel::Organic);
        assert!((prediction.confidence - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let bytes = png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            31,
            47,
            Rgb([120, 40, 200]),
        )));
        let stub = StubClassifier(vec![0.2, 0.5, 0.2, 0.1]);

        let first = predict(&bytes, &stub).unwrap();
        let second = predict(&bytes, &stub).unwrap();
        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn test_preprocess_normalizes_any_input_shape() {
        let side = INPUT_SIZE as usize;
        let inputs = vec![
            png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                640,
                480,
                Rgb([255, 0, 128]),
            ))),
            png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                33,
                17,
                Rgba([10, 20, 30, 128]),
            ))),
            png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
                100,
                300,
                image::Luma([200]),
            ))),
        ];

        for bytes in inputs {
            let tensor = preprocess(&bytes).unwrap();
            assert_eq!(tensor.shape(), &[1, side, side, CHANNELS]);
            assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_preprocess_grayscale_expands_channels() {
        let bytes = png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            50,
            50,
            image::Luma([100]),
        )));
        let tensor = preprocess(&bytes).unwrap();

        // All three channels carry the gray value
        let expected = 100.0 / 255.0;
        for c in 0..CHANNELS {
            assert!((tensor[[0, 10, 10, c]] - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_invalid_bytes_are_rejected() {
        let result = predict(b"definitely not an image", &StubClassifier(vec![1.0]));
        assert!(matches!(result, Err(InferenceError::InvalidImage(_))));
    }

    #[test]
    fn test_argmax_is_stable_on_ties() {
        assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]), Some((0, 0.25)));
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), Some((1, 0.4)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_out_of_range_winner_maps_to_unknown() {
        let bytes = black_rgb_png(10, 10);
        // Six outputs, maximum beyond the four known classes
        let stub = StubClassifier(vec![0.0, 0.1, 0.0, 0.1, 0.1, 0.7]);

        let prediction = predict(&bytes, &stub).unwrap();
        assert_eq!(prediction.label, WasteLabel::Unknown);
    }

    #[test]
    fn test_engine_status_tracks_inference_metrics() {
        let bytes = black_rgb_png(10, 10);
        let stub = StubClassifier(vec![0.7, 0.1, 0.1, 0.1]);

        let before = engine_status().inference_count;
        predict(&bytes, &stub).unwrap();
        let status = engine_status();

        assert!(status.inference_count > before);
        assert!(status.avg_latency_ms > 0.0);
        // No real model is ever loaded in unit tests
        assert!(!status.model_loaded);
        assert_eq!(status.model_name, "None");
    }

    #[test]
    fn test_empty_scores_are_an_error() {
        let bytes = black_rgb_png(10, 10);
        let result = predict(&bytes, &StubClassifier(Vec::new()));
        assert!(matches!(result, Err(InferenceError::Session(_))));
    }
}
