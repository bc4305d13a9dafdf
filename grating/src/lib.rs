//! Grating - structured illumination pattern analysis.
//!
//! Recovers the angle, phase and wavelength of a sinusoidal illumination
//! grating from the 2D frequency spectrum of an image:
//! - Synthesize reference grating patterns
//! - Compute FFT or Hartley spectra of square grids
//! - Estimate grating parameters from the dominant spectral peak
//! - Normalize any real grid to 8-bit grayscale for display
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use grating::{create_corner_mask, estimate, synthesize_pattern, transform, TransformMode};
//!
//! let pattern = synthesize_pattern(32, 0.0, 0.0, 8.0)?;
//! let spectrum = transform(&pattern, TransformMode::Fft);
//! let mask = create_corner_mask(32, 2.0)?;
//! let params = estimate(&spectrum, Some(&mask))?;
//!
//! println!("{params}");
//! ```

mod config;
mod error;
mod estimate;
mod grid;
mod mask;
mod normalize;
mod params;
mod pattern;
pub mod pipeline;
mod spectrum;

// ============================================================================
// Core types
// ============================================================================

pub use error::{GratingError, Result};
pub use grid::{ByteGrid, Grid, Mask, Square};
pub use params::SiParameters;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{AnalysisConfig, DEFAULT_MASK_RADIUS, MIN_SIZE};

// ============================================================================
// Pattern synthesis
// ============================================================================

pub use pattern::{multiply, synthesize, synthesize_pattern};

// ============================================================================
// Spectral transform
// ============================================================================

pub use spectrum::{
    bin_angle, bin_wavelength, fold_coords, transform, transform_values, SpectralResult,
    SpectrumView, TransformMode,
};

// ============================================================================
// Masks and estimation
// ============================================================================

pub use estimate::{estimate, estimate_peak, find_peak, PeakEstimate, ScanRange, PEAK_SCAN_RANGE};
pub use mask::{create_corner_mask, create_dc_mask, create_mask};

// ============================================================================
// Normalization
// ============================================================================

pub use normalize::{normalize_linear, normalize_log, normalize_to_bytes, normalize_to_image};

pub use pipeline::{analyze, analyze_pattern, analyze_product, Analysis};
