//! Example: Recover grating parameters from a synthetic pattern
//!
//! Synthesizes the reference pattern described by the configuration, runs the
//! analysis pipeline and writes grayscale previews of the input and of the
//! selected spectrum view to test_output/grating.
//!
//! The configuration is read from the YAML file named by GRATING_CONFIG when
//! set, otherwise defaults are used.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example analyze_pattern
//! GRATING_CONFIG=analysis.yaml RUST_LOG=debug cargo run --example analyze_pattern
//! ```
//!
//! Example configuration:
//! ```yaml
//! size: 128
//! pattern:
//!   angle: 0.6
//!   phase: 1.5
//!   wavelength: 12.0
//! view: Magnitude
//! mask_radius: 3.0
//! logarithmic: true
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use grating::{analyze_pattern, AnalysisConfig};

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info", None);

    let config = match env::var("GRATING_CONFIG") {
        Ok(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {path}"))?;
            AnalysisConfig::from_yaml(&text)?
        }
        Err(_) => AnalysisConfig::default(),
    };
    tracing::info!(?config, "Analysis configuration");

    let start = Instant::now();
    let analysis = analyze_pattern(&config)?;
    tracing::info!(elapsed = ?start.elapsed(), "Analysis finished");

    tracing::info!("Reference:  {}", config.pattern);
    match &analysis.peak {
        Ok(peak) => tracing::info!(
            index = peak.index,
            magnitude = peak.magnitude,
            "Estimated:  {}",
            peak.parameters
        ),
        Err(e) => tracing::warn!("No estimate: {e}"),
    }

    let output_dir = PathBuf::from("test_output/grating");
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let input_path = output_dir.join("input.png");
    analysis.input_preview.to_gray_image().save(&input_path)?;

    let spectrum_path = output_dir.join(format!("spectrum_{:?}.png", config.view).to_lowercase());
    analysis.spectrum_preview.to_gray_image().save(&spectrum_path)?;

    tracing::info!(
        input = %input_path.display(),
        spectrum = %spectrum_path.display(),
        "Previews written"
    );

    Ok(())
}
