use thiserror::Error;

use crate::spectrum::TransformMode;

/// Errors reported by the grating engine.
///
/// Every failure is local and recoverable. A uniform input to the normalizer
/// is not an error: it produces an all-zero byte grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GratingError {
    #[error("Grid of {len} values does not match size {size} (expected {size}x{size})")]
    InvalidDimension { len: usize, size: usize },

    #[error("Grid size must be at least 1")]
    ZeroSize,

    #[error("Image is not square: {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    #[error("Size {size} is not a power of two")]
    NotPowerOfTwo { size: usize },

    #[error("Grid size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Operation is not available for a {mode:?} transform")]
    UnsupportedMode { mode: TransformMode },

    #[error("Bin {index} is out of range for {len} bins")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Bin {index} has zero frequency, wavelength is undefined")]
    UndefinedFrequency { index: usize },

    #[error("Wavelength must be finite and non-zero, got {0}")]
    InvalidWavelength(f64),

    #[error("No unmasked bin in the scanned range")]
    EmptySearch,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GratingError>;
