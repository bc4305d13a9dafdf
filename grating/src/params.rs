use std::fmt;

use serde::{Deserialize, Serialize};

/// Geometric parameters of a sinusoidal illumination grating.
///
/// `angle` is in radians, `phase` and `wavelength` in pixels. Values recovered
/// from a spectrum have `angle` in `(-PI, PI]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiParameters {
    pub angle: f64,
    pub phase: f64,
    pub wavelength: f64,
}

impl SiParameters {
    pub fn new(angle: f64, phase: f64, wavelength: f64) -> Self {
        Self {
            angle,
            phase,
            wavelength,
        }
    }
}

impl Default for SiParameters {
    fn default() -> Self {
        Self {
            angle: 0.0,
            phase: 0.0,
            wavelength: 8.0,
        }
    }
}

impl fmt::Display for SiParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "angle {:.4}, phase {:.4}, wavelength {:.4}",
            self.angle, self.phase, self.wavelength
        )
    }
}
