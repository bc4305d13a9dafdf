//! 2D spectral transforms of square grids.
//!
//! Two transforms are supported:
//! 1. A complex forward FFT with no normalization, stored as separate real and
//!    imaginary planes.
//! 2. A discrete Hartley transform, a single real plane.
//!
//! Both leave the lowest frequencies at the grid corners. Bin coordinates are
//! folded to signed frequencies (`x > size / 2` becomes `x - size`) before any
//! angle or wavelength math.


use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{GratingError, Result};
use crate::grid::Grid;
use crate::params::SiParameters;

/// Kind of spectral transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformMode {
    /// Complex forward Fourier transform (real and imaginary planes).
    #[default]
    Fft,
    /// Discrete Hartley transform (single real plane, no phase).
    Dht,
}

/// Derived plane of a spectral result, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpectrumView {
    /// The Hartley transform itself.
    Hartley,
    /// `sqrt(re^2 + im^2)` of the FFT.
    #[default]
    Magnitude,
    Real,
    Imaginary,
    /// Phase of every FFT bin, in pixels.
    Phase,
}

impl SpectrumView {
    /// Transform mode that produces this view.
    pub fn required_mode(&self) -> TransformMode {
        match self {
            SpectrumView::Hartley => TransformMode::Dht,
            SpectrumView::Magnitude
            | SpectrumView::Real
            | SpectrumView::Imaginary
            | SpectrumView::Phase => TransformMode::Fft,
        }
    }
}

/// Output of one [`transform`] call.
///
/// Immutable; the next transform produces a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralResult {
    mode: TransformMode,
    real: Grid,
    imag: Option<Grid>,
}

/// Computes the spectral transform of `grid`.
pub fn transform(grid: &Grid, mode: TransformMode) -> SpectralResult {
    let size = grid.size();
    let spectrum = fft_2d(grid.values(), size);

    let result = match mode {
        TransformMode::Fft => {
            let real = spectrum.iter().map(|c| c.re).collect();
            let imag = spectrum.iter().map(|c| c.im).collect();
            SpectralResult {
                mode,
                real: square(size, real),
                imag: Some(square(size, imag)),
            }
        }
        TransformMode::Dht => {
            // For real input, H(k) = Re F(k) - Im F(k): the cas kernel is cos + sin.
            let hartley = spectrum.iter().map(|c| c.re - c.im).collect();
            SpectralResult {
                mode,
                real: square(size, hartley),
                imag: None,
            }
        }
    };

    tracing::debug!(size, ?mode, "Computed spectral transform");

    result
}

/// Same as [`transform`], but takes an unchecked flat slice.
pub fn transform_values(
    values: &[f64],
    size: usize,
    mode: TransformMode,
) -> Result<SpectralResult> {
    let grid = Grid::new(size, values.to_vec())?;
    Ok(transform(&grid, mode))
}

fn square(size: usize, values: Vec<f64>) -> Grid {
    Grid::from_transform(size, values)
}

/// Unnormalized forward 2D FFT using row-column decomposition.
///
/// A fresh plan is built on every call; no transform state is kept between calls.
fn fft_2d(values: &[f64], size: usize) -> Vec<Complex<f64>> {
    let mut planner = FftPlanner::<f64>::new();
    let fft: Arc<dyn Fft<f64>> = planner.plan_fft_forward(size);

    let mut data: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();

    // Rows
    for row in data.chunks_exact_mut(size) {
        fft.process(row);
    }

    transpose_inplace(&mut data, size);

    // Columns (now rows after transpose)
    for row in data.chunks_exact_mut(size) {
        fft.process(row);
    }

    transpose_inplace(&mut data, size);

    data
}

/// In-place square matrix transpose.
fn transpose_inplace(data: &mut [Complex<f64>], n: usize) {
    for i in 0..n {
        for j in (i + 1)..n {
            data.swap(i * n + j, j * n + i);
        }
    }
}

/// Signed frequency coordinates of flat `index` in a `size x size` spectrum.
pub fn fold_coords(index: usize, size: usize) -> (isize, isize) {
    let half = size / 2;
    let fold = |c: usize| -> isize {
        if c > half {
            c as isize - size as isize
        } else {
            c as isize
        }
    };
    (fold(index % size), fold(index / size))
}

/// Direction of the bin's frequency vector, `atan2(y, x)` of folded coordinates.
pub fn bin_angle(index: usize, size: usize) -> f64 {
    let (x, y) = fold_coords(index, size);
    (y as f64).atan2(x as f64)
}

/// Wavelength in pixels of the bin's frequency; infinite at the DC bin.
pub fn bin_wavelength(index: usize, size: usize) -> f64 {
    let (x, y) = fold_coords(index, size);
    size as f64 / ((x * x + y * y) as f64).sqrt()
}

impl SpectralResult {
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn size(&self) -> usize {
        self.real.size()
    }

    /// Real plane for FFT results, the Hartley plane for DHT results.
    pub fn real(&self) -> &Grid {
        &self.real
    }

    pub fn imag(&self) -> Option<&Grid> {
        self.imag.as_ref()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.real.len();
        if index >= len {
            return Err(GratingError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn require_imag(&self) -> Result<&Grid> {
        self.imag
            .as_ref()
            .ok_or(GratingError::UnsupportedMode { mode: self.mode })
    }

    pub fn magnitude_at(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        let imag = self.require_imag()?;
        let (re, im) = (self.real[index], imag[index]);
        Ok((re * re + im * im).sqrt())
    }

    pub fn magnitude(&self) -> Result<Grid> {
        let imag = self.require_imag()?;
        let values = self
            .real
            .iter()
            .zip(imag.iter())
            .map(|(&re, &im)| (re * re + im * im).sqrt())
            .collect();
        Grid::new(self.size(), values)
    }

    /// Phase in radians, offset by `PI / 2` so a sine grating reads zero.
    pub fn phase_radians_at(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        let imag = self.require_imag()?;
        Ok(imag[index].atan2(self.real[index]) + PI / 2.0)
    }

    /// Phase as a displacement in pixels along the grating.
    pub fn phase_pixels_at(&self, index: usize) -> Result<f64> {
        let radians = self.phase_radians_at(index)?;
        Ok(radians / (2.0 * PI) * self.wavelength_at(index))
    }

    /// Phase in pixels for every bin. Not finite at the DC bin.
    pub fn phase(&self) -> Result<Grid> {
        let values = (0..self.real.len())
            .map(|i| self.phase_pixels_at(i))
            .collect::<Result<Vec<_>>>()?;
        Grid::new(self.size(), values)
    }

    pub fn angle_at(&self, index: usize) -> f64 {
        bin_angle(index, self.size())
    }

    pub fn wavelength_at(&self, index: usize) -> f64 {
        bin_wavelength(index, self.size())
    }

    /// Grating parameters described by a single bin.
    pub fn parameters_at(&self, index: usize) -> Result<SiParameters> {
        self.check_index(index)?;
        self.require_imag()?;
        if fold_coords(index, self.size()) == (0, 0) {
            return Err(GratingError::UndefinedFrequency { index });
        }

        Ok(SiParameters {
            angle: self.angle_at(index),
            phase: self.phase_pixels_at(index)?,
            wavelength: self.wavelength_at(index),
        })
    }

    /// Plane to visualise for `view`.
    pub fn view(&self, view: SpectrumView) -> Result<Grid> {
        match (view, self.mode) {
            (SpectrumView::Hartley, TransformMode::Dht) => Ok(self.real.clone()),
            (SpectrumView::Hartley, TransformMode::Fft) => {
                Err(GratingError::UnsupportedMode { mode: self.mode })
            }
            (SpectrumView::Magnitude, _) => self.magnitude(),
            (SpectrumView::Real, _) => self.require_imag().map(|_| self.real.clone()),
            (SpectrumView::Imaginary, _) => self.require_imag().cloned(),
            (SpectrumView::Phase, _) => self.phase(),
        }
    }

    /// Short human-readable readout of one bin.
    pub fn describe_bin(&self, index: usize) -> Result<String> {
        self.check_index(index)?;
        Ok(BinReadout {
            result: self,
            index,
        }
        .to_string())
    }
}

struct BinReadout<'a> {
    result: &'a SpectralResult,
    index: usize,
}

impl fmt::Display for BinReadout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let re = self.result.real[self.index];
        match self.result.imag() {
            None => write!(f, "{:.4}", re),
            Some(imag) => {
                let im = imag[self.index];
                let abs = (re * re + im * im).sqrt();
                let phase_px = self
                    .result
                    .phase_pixels_at(self.index)
                    .unwrap_or(f64::NAN);
                write!(
                    f,
                    "{:.4}{:+.4}i, abs {:.4}, phase {:.4}",
                    re, im, abs, phase_px
                )
            }
        }
    }
}
