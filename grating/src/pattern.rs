//! Synthetic grating patterns and the image-times-pattern product.

use std::f64::consts::PI;

use crate::error::{GratingError, Result};
use crate::grid::Grid;
use crate::params::SiParameters;

/// Builds a grating intensity grid with values in `[0, 1]`.
///
/// The sampling coordinate is rotated into the grating frame around the
/// center `(size / 2, size / 2)`, so the sinusoid always runs along a line
/// through the center at `angle`.
pub fn synthesize_pattern(size: usize, angle: f64, phase: f64, wavelength: f64) -> Result<Grid> {
    if wavelength == 0.0 || !wavelength.is_finite() {
        return Err(GratingError::InvalidWavelength(wavelength));
    }

    let center = (size / 2) as f64;
    Grid::from_fn(size, |x, y| {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        let r = (dx * dx + dy * dy).sqrt();
        let x2 = center + r * (dy.atan2(dx) - angle).cos();
        (1.0 + (2.0 * PI * (x2 + phase) / wavelength).sin()) / 2.0
    })
}

pub fn synthesize(size: usize, params: &SiParameters) -> Result<Grid> {
    synthesize_pattern(size, params.angle, params.phase, params.wavelength)
}

/// Element-wise product of two grids together with the sum of all products.
pub fn multiply(a: &Grid, b: &Grid) -> Result<(Grid, f64)> {
    a.ensure_same_size(b)?;

    let product: Vec<f64> = a.iter().zip(b.iter()).map(|(&l, &r)| l * r).collect();
    let sum = product.iter().sum();

    Ok((Grid::new(a.size(), product)?, sum))
}
