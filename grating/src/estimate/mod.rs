//! Grating parameter estimation from the dominant spectral peak.
//!
//! The estimator is a single-peak heuristic: it picks the strongest unmasked
//! FFT bin inside the scanned range and reads angle, wavelength and phase off
//! that bin. The trivial DC peak is kept out by the mask (see [`crate::mask`])
//! and, for the default [`PEAK_SCAN_RANGE`], by scanning only the first half of
//! the flat array, which also skips most Fourier mirror images.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{GratingError, Result};
use crate::grid::Mask;
use crate::params::SiParameters;
use crate::spectrum::{SpectralResult, TransformMode};

/// Which flat indices take part in the peak search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanRange {
    /// Indices `0 .. len / 2`: the first half of the row-major layout, not a
    /// geometric half-plane.
    #[default]
    FirstHalf,
    /// Every index.
    Full,
}

impl ScanRange {
    /// Exclusive upper bound of the scan for a grid with `len` elements.
    #[inline]
    pub fn end(&self, len: usize) -> usize {
        match self {
            ScanRange::FirstHalf => len / 2,
            ScanRange::Full => len,
        }
    }
}

/// Scan policy used by [`estimate`]. Pair it with a corner mask from
/// [`crate::mask::create_corner_mask`].
pub const PEAK_SCAN_RANGE: ScanRange = ScanRange::FirstHalf;

/// Strongest bin found by the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakEstimate {
    pub index: usize,
    pub magnitude: f64,
    pub parameters: SiParameters,
}

/// Index of the maximum over the scanned range, skipping masked-out indices.
///
/// Comparison is strict, so the first index reaching a new maximum wins ties.
/// NaN values never win. Returns `None` when no index is eligible.
///
/// A `mask` shorter than the scanned range leaves nothing eligible.
pub fn find_peak(values: &[f64], mask: Option<&[bool]>, range: ScanRange) -> Option<usize> {
    let end = range.end(values.len());
    if let Some(mask) = mask {
        if mask.len() < end {
            tracing::debug!(mask_len = mask.len(), end, "Mask does not cover the scan range");
            return None;
        }
    }
    let mut best: Option<(usize, f64)> = None;

    for (i, &v) in values[..end].iter().enumerate() {
        if v.is_nan() || mask.is_some_and(|m| !m[i]) {
            continue;
        }
        match best {
            Some((_, max)) if v <= max => {}
            _ => best = Some((i, v)),
        }
    }

    best.map(|(i, _)| i)
}

/// Estimates grating parameters from an FFT result using [`PEAK_SCAN_RANGE`].
pub fn estimate(result: &SpectralResult, mask: Option<&Mask>) -> Result<SiParameters> {
    estimate_peak(result, mask, PEAK_SCAN_RANGE).map(|peak| peak.parameters)
}

/// Finds the dominant bin and derives grating parameters from it.
pub fn estimate_peak(
    result: &SpectralResult,
    mask: Option<&Mask>,
    range: ScanRange,
) -> Result<PeakEstimate> {
    if result.mode() != TransformMode::Fft {
        return Err(GratingError::UnsupportedMode {
            mode: result.mode(),
        });
    }
    if let Some(mask) = mask {
        result.real().ensure_same_size(mask)?;
    }

    let magnitude = result.magnitude()?;
    let Some(index) = find_peak(magnitude.values(), mask.map(|m| m.values()), range) else {
        tracing::warn!(size = result.size(), ?range, "No eligible bin for peak search");
        return Err(GratingError::EmptySearch);
    };

    let parameters = result.parameters_at(index)?;

    tracing::debug!(
        index,
        magnitude = magnitude[index],
        angle = parameters.angle,
        phase = parameters.phase,
        wavelength = parameters.wavelength,
        "Estimated grating parameters"
    );

    Ok(PeakEstimate {
        index,
        magnitude: magnitude[index],
        parameters,
    })
}
