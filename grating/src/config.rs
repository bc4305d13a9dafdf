//! Analysis configuration.
//!
//! Everything a host needs to recompute an analysis snapshot: grid size,
//! reference pattern, which spectrum view to show and how to mask and
//! normalize it.

use serde::{Deserialize, Serialize};

use crate::error::{GratingError, Result};
use crate::estimate::{ScanRange, PEAK_SCAN_RANGE};
use crate::params::SiParameters;
use crate::spectrum::{SpectrumView, TransformMode};

/// Smallest grid edge accepted for analysis.
pub const MIN_SIZE: usize = 4;

/// Default exclusion radius around the spectrum corners, in bins.
pub const DEFAULT_MASK_RADIUS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Edge length of the square grid. Power of two for exact transforms.
    pub size: usize,
    /// Parameters of the synthetic reference pattern.
    pub pattern: SiParameters,
    /// Spectrum plane to visualise. Also selects the transform mode.
    pub view: SpectrumView,
    /// Corner exclusion radius; `None` masks only the DC bin.
    pub mask_radius: Option<f64>,
    /// Flat index range searched for the spectral peak.
    pub scan_range: ScanRange,
    /// Logarithmic instead of linear grayscale mapping.
    pub logarithmic: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            size: 256,
            pattern: SiParameters::default(),
            view: SpectrumView::default(),
            mask_radius: Some(DEFAULT_MASK_RADIUS),
            scan_range: PEAK_SCAN_RANGE,
            logarithmic: false,
        }
    }
}

impl AnalysisConfig {
    /// Transform mode implied by [`Self::view`].
    pub fn mode(&self) -> TransformMode {
        self.view.required_mode()
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < MIN_SIZE {
            return Err(GratingError::Config(format!(
                "size must be at least {MIN_SIZE}, got {}",
                self.size
            )));
        }
        let wavelength = self.pattern.wavelength;
        if wavelength == 0.0 || !wavelength.is_finite() {
            return Err(GratingError::InvalidWavelength(wavelength));
        }
        if !self.pattern.angle.is_finite() || !self.pattern.phase.is_finite() {
            return Err(GratingError::Config(format!(
                "pattern angle and phase must be finite, got {}",
                self.pattern
            )));
        }
        if let Some(radius) = self.mask_radius {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(GratingError::Config(format!(
                    "mask_radius must be finite and non-negative, got {radius}"
                )));
            }
        }
        Ok(())
    }

    /// Twice the current size.
    pub fn doubled_size(&self) -> usize {
        self.size.saturating_mul(2)
    }

    /// Half the current size, never below [`MIN_SIZE`].
    pub fn halved_size(&self) -> usize {
        if self.size > MIN_SIZE {
            (self.size / 2).max(MIN_SIZE)
        } else {
            self.size
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self =
            serde_yml::from_str(text).map_err(|e| GratingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|e| GratingError::Config(e.to_string()))
    }
}
