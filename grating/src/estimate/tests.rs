//! Tests for peak search and parameter estimation.

use std::f64::consts::PI;

use super::*;
use crate::grid::Grid;
use crate::mask::{create_corner_mask, create_dc_mask};
use crate::pattern::synthesize_pattern;
use crate::spectrum::transform;
use common::float_ext::FloatExt;

fn ramp_with_spike(size: usize, spike: usize) -> Vec<f64> {
    let mut values: Vec<f64> = (0..size * size).map(|i| i as f64).collect();
    values[spike] = 10000.0;
    values
}

fn fft_of(size: usize, angle: f64, phase: f64, wavelength: f64) -> SpectralResult {
    let pattern = synthesize_pattern(size, angle, phase, wavelength).unwrap();
    transform(&pattern, TransformMode::Fft)
}

#[test]
fn default_scan_range_is_first_half() {
    assert_eq!(PEAK_SCAN_RANGE, ScanRange::FirstHalf);
    assert_eq!(ScanRange::FirstHalf.end(16), 8);
    assert_eq!(ScanRange::Full.end(16), 16);
}

#[test]
fn find_peak_first_half_without_mask() {
    let values = ramp_with_spike(4, 2);
    assert_eq!(find_peak(&values, None, ScanRange::FirstHalf), Some(2));
}

#[test]
fn find_peak_first_half_skips_masked_maximum() {
    let size = 4;
    let values = ramp_with_spike(size, 2);
    let mut mask = vec![true; size * size];
    mask[2] = false;

    // The last index of the first half is the largest remaining value
    assert_eq!(
        find_peak(&values, Some(&mask), ScanRange::FirstHalf),
        Some(values.len() / 2 - 1)
    );
}

#[test]
fn find_peak_full_range_skips_masked_maximum() {
    let size = 4;
    let values = ramp_with_spike(size, 2);
    let mut mask = vec![true; size * size];
    mask[2] = false;

    assert_eq!(find_peak(&values, None, ScanRange::Full), Some(2));
    assert_eq!(
        find_peak(&values, Some(&mask), ScanRange::Full),
        Some(values.len() - 1)
    );
}

#[test]
fn find_peak_with_short_mask_finds_nothing() {
    let values = ramp_with_spike(4, 2);
    let short = [true; 4];

    assert_eq!(find_peak(&values, Some(&short), ScanRange::FirstHalf), None);
    assert_eq!(find_peak(&values, Some(&short), ScanRange::Full), None);

    // A mask covering only the first half is enough for the default range
    let half = [true; 8];
    assert_eq!(find_peak(&values, Some(&half), ScanRange::FirstHalf), Some(2));
    assert_eq!(find_peak(&values, Some(&half), ScanRange::Full), None);
}

#[test]
fn find_peak_ignores_second_half_in_default_range() {
    let size = 4;
    let mut values = vec![0.0; size * size];
    values[3] = 1.0;
    values[12] = 50.0;

    assert_eq!(find_peak(&values, None, ScanRange::FirstHalf), Some(3));
    assert_eq!(find_peak(&values, None, ScanRange::Full), Some(12));
}

#[test]
fn find_peak_first_index_wins_ties() {
    let values = [0.0, 5.0, 5.0, 1.0, 5.0, 0.0, 0.0, 0.0];
    assert_eq!(find_peak(&values, None, ScanRange::Full), Some(1));
}

#[test]
fn find_peak_skips_nan() {
    let values = [f64::NAN, 1.0, 2.0, f64::NAN];
    assert_eq!(find_peak(&values, None, ScanRange::Full), Some(2));
}

#[test]
fn find_peak_with_everything_masked() {
    let values = [1.0, 2.0, 3.0, 4.0];
    let mask = [false; 4];
    assert_eq!(find_peak(&values, Some(&mask), ScanRange::Full), None);
    assert_eq!(find_peak(&[], None, ScanRange::FirstHalf), None);
}

#[test]
fn estimate_recovers_vertical_grating() {
    let size = 32;
    let result = fft_of(size, PI / 2.0, 0.0, 8.0);
    let mask = create_corner_mask(size, 2.0).unwrap();

    let peak = estimate_peak(&result, Some(&mask), PEAK_SCAN_RANGE).unwrap();
    assert_eq!(peak.index, 4 * size, "peak at folded frequency (0, 4)");
    assert!(peak.magnitude.within(256.0, 1e-6));

    let params = estimate(&result, Some(&mask)).unwrap();
    assert!(params.angle.within(PI / 2.0, 1e-3), "angle {}", params.angle);
    assert!(params.phase.within(0.0, 1e-3), "phase {}", params.phase);
    assert!(params.wavelength.within(8.0, 1e-3));
}

#[test]
fn estimate_recovers_phase_offset() {
    let size = 32;
    let result = fft_of(size, PI / 2.0, 2.0, 8.0);
    let mask = create_corner_mask(size, 2.0).unwrap();

    let params = estimate(&result, Some(&mask)).unwrap();
    assert!(params.angle.within(PI / 2.0, 1e-3));
    assert!(params.phase.within(2.0, 1e-3), "phase {}", params.phase);
    assert!(params.wavelength.within(8.0, 1e-3));
}

#[test]
fn estimate_recovers_diagonal_grating() {
    let size = 32;
    // Frequency vector (4, 4) lands exactly on a bin
    let wavelength = size as f64 / 32.0_f64.sqrt();
    let result = fft_of(size, PI / 4.0, 0.0, wavelength);
    let mask = create_corner_mask(size, 2.0).unwrap();

    let peak = estimate_peak(&result, Some(&mask), PEAK_SCAN_RANGE).unwrap();
    assert_eq!(peak.index, 4 * size + 4);
    assert!(peak.parameters.angle.within(PI / 4.0, 1e-3));
    assert!(peak.parameters.wavelength.within(wavelength, 1e-3));
}

#[test]
fn estimate_with_dc_mask_only() {
    let size = 32;
    let result = fft_of(size, PI / 2.0, 0.0, 8.0);
    let mask = create_dc_mask(size).unwrap();

    let peak = estimate_peak(&result, Some(&mask), ScanRange::FirstHalf).unwrap();
    assert_eq!(peak.index, 4 * size);
}

#[test]
fn estimate_without_mask_hits_dc() {
    let result = fft_of(32, PI / 2.0, 0.0, 8.0);
    assert_eq!(
        estimate(&result, None),
        Err(GratingError::UndefinedFrequency { index: 0 })
    );
}

#[test]
fn estimate_rejects_hartley_result() {
    let pattern = synthesize_pattern(16, 0.0, 0.0, 4.0).unwrap();
    let result = transform(&pattern, TransformMode::Dht);
    assert_eq!(
        estimate(&result, None),
        Err(GratingError::UnsupportedMode {
            mode: TransformMode::Dht
        })
    );
}

#[test]
fn estimate_rejects_mask_of_other_size() {
    let result = fft_of(16, 0.0, 0.0, 4.0);
    let mask = create_dc_mask(8).unwrap();
    assert_eq!(
        estimate(&result, Some(&mask)),
        Err(GratingError::SizeMismatch {
            expected: 16,
            actual: 8
        })
    );
}

#[test]
fn estimate_with_everything_masked() {
    let result = fft_of(8, 0.0, 0.0, 4.0);
    let mask = Mask::new(8, vec![false; 64]).unwrap();
    assert_eq!(estimate(&result, Some(&mask)), Err(GratingError::EmptySearch));
}

#[test]
fn estimate_on_uniform_input_reports_instead_of_panicking() {
    let size = 8;
    let flat = Grid::new(size, vec![0.0; size * size]).unwrap();
    let result = transform(&flat, TransformMode::Fft);

    // Every magnitude is zero; the first unmasked bin wins and is well defined
    let mask = create_dc_mask(size).unwrap();
    let peak = estimate_peak(&result, Some(&mask), ScanRange::FirstHalf).unwrap();
    assert_eq!(peak.index, 1);
    assert!(peak.magnitude.within(0.0, 1e-12));
}
