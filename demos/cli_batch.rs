//! Batch CLI for lab_calibration with JSON configuration
//!
//! Calibrates every image in a directory against a reference image and
//! writes the corrected images to an output directory.

use lab_calibration::{
    process_batch, BatchReport, ImageJob, PipelineConfig, PixelBuffer, ReferenceSource,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        print_help(&args[0]);
        process::exit(1);
    }

    let config_path = Path::new(&args[1]);
    let reference_path = Path::new(&args[2]);
    let input_path = Path::new(&args[3]);
    let output_path = Path::new(&args[4]);

    // Load configuration
    let config = match PipelineConfig::from_json_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config file: {}", e);
            process::exit(1);
        }
    };

    let reference = match load_buffer(reference_path) {
        Ok(buffer) => ReferenceSource::Buffer(buffer),
        Err(e) => {
            eprintln!("Error loading reference image: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = fs::create_dir_all(output_path) {
        eprintln!("Error creating output directory: {}", e);
        process::exit(1);
    }

    let image_files = match find_image_files(input_path) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error finding image files: {}", e);
            process::exit(1);
        }
    };

    if image_files.is_empty() {
        eprintln!("No image files found in {}", input_path.display());
        process::exit(1);
    }

    eprintln!("Found {} image files to process", image_files.len());

    let mut jobs = Vec::with_capacity(image_files.len());
    let mut load_errors = 0;
    for path in &image_files {
        match load_buffer(path) {
            Ok(buffer) => jobs.push(ImageJob::new(path.display().to_string(), buffer)),
            Err(e) => {
                eprintln!("✗ {}: {}", path.display(), e);
                load_errors += 1;
            }
        }
    }

    let report = match process_batch(config, Some(&reference), jobs) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let error_count = load_errors + save_outputs(&report, output_path);

    eprintln!();
    eprintln!("Batch processing complete:");
    eprintln!("  Success: {}", report.succeeded());
    eprintln!("  Errors: {}", error_count);
    eprintln!(
        "  Confidence: {} ({:?})",
        report.confidence.score, report.confidence.label
    );
    eprintln!("  Output saved to: {}", output_path.display());

    if error_count > 0 {
        process::exit(1);
    }
}

fn print_help(program_name: &str) {
    eprintln!(
        "Usage: {} <config.json> <reference> <input> <output_dir>",
        program_name
    );
    eprintln!();
    eprintln!("Normalize a batch of photographs against a reference image.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json    JSON file containing pipeline configuration");
    eprintln!("  reference      Reference image the batch is matched to");
    eprintln!("  input          Image file or directory of images");
    eprintln!("  output_dir     Directory for corrected PNG files");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG=debug Log every pipeline step");
}

fn load_buffer(path: &Path) -> Result<PixelBuffer, Box<dyn std::error::Error>> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::from_raw(width, height, rgba.into_raw())?)
}

/// Write corrected images and report failures; returns the failure count
fn save_outputs(report: &BatchReport, output_dir: &Path) -> usize {
    let mut errors = 0;
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(corrected) => {
                let base_name = Path::new(&outcome.id)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let path = output_dir.join(format!("{}_calibrated.png", base_name));
                let buffer = &corrected.buffer;
                let saved = image::save_buffer(
                    &path,
                    buffer.as_bytes(),
                    buffer.width(),
                    buffer.height(),
                    image::ExtendedColorType::Rgba8,
                );
                match saved {
                    Ok(()) => eprintln!("✓ {}", outcome.id),
                    Err(e) => {
                        eprintln!("✗ {}: {}", outcome.id, e);
                        errors += 1;
                    }
                }
            }
            Err(failure) => {
                eprintln!("✗ {}: {}", outcome.id, failure.error);
                errors += 1;
            }
        }
    }
    errors
}

fn find_image_files(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();

    if dir.is_file() {
        files.push(dir.to_path_buf());
        return Ok(files);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if matches!(ext.as_str(), "jpg" | "jpeg" | "png" | "tif" | "tiff") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
