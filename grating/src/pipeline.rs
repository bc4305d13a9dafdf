//! One-shot analysis: transform, mask, estimate and render previews.
//!
//! Every call recomputes from scratch and returns a fresh [`Analysis`]. Hosts
//! that recompute on parameter edits keep the latest snapshot and drop the old
//! one; nothing is shared between calls.

use crate::config::{AnalysisConfig, MIN_SIZE};
use crate::error::{GratingError, Result};
use crate::estimate::{estimate_peak, PeakEstimate};
use crate::grid::{ByteGrid, Grid, Mask};
use crate::mask::create_mask;
use crate::normalize::normalize_to_bytes;
use crate::pattern::{multiply, synthesize};
use crate::spectrum::{transform, SpectralResult};

/// Immutable snapshot of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Grid that was transformed.
    pub input: Grid,
    pub spectrum: SpectralResult,
    pub mask: Mask,
    /// Dominant peak; `Err` for Hartley results or when no valid bin exists.
    pub peak: Result<PeakEstimate>,
    /// Sum of the image-times-pattern product, when the input is a product.
    pub product_sum: Option<f64>,
    /// Linear grayscale of the input.
    pub input_preview: ByteGrid,
    /// Grayscale of the configured spectrum view, masked.
    pub spectrum_preview: ByteGrid,
}

/// Analyzes an arbitrary input grid.
///
/// The grid's own size is used; `config.size` only applies to synthesized
/// patterns. The grid must still be at least [`MIN_SIZE`].
pub fn analyze(input: Grid, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    ensure_min_size(input.size())?;
    run(input, None, config)
}

/// Analyzes the synthetic reference pattern described by `config`.
pub fn analyze_pattern(config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    let pattern = synthesize(config.size, &config.pattern)?;
    run(pattern, None, config)
}

/// Analyzes the product of `image` and the reference pattern.
///
/// The pattern is synthesized at the image size; `config.size` is not used.
pub fn analyze_product(image: &Grid, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;
    ensure_min_size(image.size())?;
    let pattern = synthesize(image.size(), &config.pattern)?;
    let (product, sum) = multiply(image, &pattern)?;
    run(product, Some(sum), config)
}

fn ensure_min_size(size: usize) -> Result<()> {
    if size < MIN_SIZE {
        return Err(GratingError::Config(format!(
            "input size must be at least {MIN_SIZE}, got {size}"
        )));
    }
    Ok(())
}

fn run(input: Grid, product_sum: Option<f64>, config: &AnalysisConfig) -> Result<Analysis> {
    let size = input.size();
    let mode = config.mode();

    let spectrum = transform(&input, mode);
    let mask = create_mask(size, config.mask_radius)?;
    let peak = estimate_peak(&spectrum, Some(&mask), config.scan_range);

    let input_preview = normalize_to_bytes(&input, None, false)?;
    let view = spectrum.view(config.view)?;
    let spectrum_preview = normalize_to_bytes(&view, Some(&mask), config.logarithmic)?;

    match &peak {
        Ok(peak) => tracing::debug!(
            size,
            ?mode,
            index = peak.index,
            "Analysis complete: {}",
            peak.parameters
        ),
        Err(e) => tracing::debug!(size, ?mode, "Analysis complete without peak: {e}"),
    }

    Ok(Analysis {
        input,
        spectrum,
        mask,
        peak,
        product_sum,
        input_preview,
        spectrum_preview,
    })
}
