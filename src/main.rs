//! EcoSort CLI - Classify a Waste Image
//!
//! Thin stand-in for the presentation layer: reads an image file,
//! runs the classifier and prints the prediction plus disposal tips.

use std::process::ExitCode;

use ecosort_core::constants;
use ecosort_core::logic::model::provider;
use ecosort_core::logic::{advice, model};

fn print_usage() {
    eprintln!("Usage: ecosort [--json] <image-path>");
    eprintln!("       ecosort --verify");
    eprintln!("       ecosort --status");
    eprintln!();
    eprintln!("  --json    print the result as JSON");
    eprintln!("  --verify  print the SHA-256 digest of the cached model artifact");
    eprintln!("  --status  print engine status (model, latency, inference count)");
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut json_output = false;
    let mut verify = false;
    let mut status = false;
    let mut image_path: Option<String> = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json_output = true,
            "--verify" => verify = true,
            "--status" => status = true,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => image_path = Some(other.to_string()),
        }
    }

    if status {
        let engine = model::engine_status();
        println!("{}", serde_json::to_string_pretty(&engine).unwrap_or_default());
        return ExitCode::SUCCESS;
    }

    if verify {
        return match provider::artifact_checksum() {
            Ok(digest) => {
                println!("{}", digest);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Checksum failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let Some(image_path) = image_path else {
        print_usage();
        return ExitCode::FAILURE;
    };

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    // Fatal startup condition: without a model there is nothing to serve
    let handle = match model::get_model() {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("Model unavailable: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Cannot read {}: {}", image_path, e);
            return ExitCode::FAILURE;
        }
    };

    match model::predict(&image_bytes, handle) {
        Ok(prediction) => {
            let tips = advice::get_advice(prediction.label);
            let colors = advice::advice_colors(prediction.label);

            if json_output {
                let report = serde_json::json!({
                    "prediction": prediction,
                    "label": prediction.label.display_name(),
                    "advice": tips,
                    "colors": colors,
                });
                println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
            } else {
                println!("Hasil Klasifikasi: {}", prediction.label);
                println!("Tingkat Kepercayaan: {:.1}%", prediction.confidence);
                println!();
                println!("{} {}", tips.icon, tips.title);
                println!("{}", tips.body);
                println!();
                println!(
                    "Warna: {} (gradien {} -> {})",
                    colors.border, colors.bg_start, colors.bg_end
                );
            }
            ExitCode::SUCCESS
        }
        Err(model::InferenceError::InvalidImage(e)) => {
            // Recovered locally: warn, no result, no further action.
            // Distinct exit code so scripted callers can tell "could
            // not classify" apart from a successful classification.
            log::warn!("Tidak dapat melakukan klasifikasi: {}", e);
            eprintln!("⚠️ Tidak dapat melakukan klasifikasi. Silakan coba dengan gambar yang lebih jelas.");
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("Inference failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
