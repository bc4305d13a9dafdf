//! Exclusion masks over frequency-domain grids.
//!
//! Forward transforms place the lowest frequencies at the four corners of the
//! grid, so the trivial peak and its wraparound neighbours live there.

use crate::error::Result;
use crate::grid::Mask;

/// Excludes only raw index `0` (the DC bin).
pub fn create_dc_mask(size: usize) -> Result<Mask> {
    Mask::from_fn(size, |x, y| x != 0 || y != 0)
}

/// Excludes a disc of `radius` around each of the four grid corners.
///
/// A cell is excluded when its Euclidean distance to the nearest corner is
/// `<= radius`.
pub fn create_corner_mask(size: usize, radius: f64) -> Result<Mask> {
    let last = size.saturating_sub(1) as f64;
    let corners = [(0.0, 0.0), (last, 0.0), (0.0, last), (last, last)];

    Mask::from_fn(size, |col, row| {
        let (col, row) = (col as f64, row as f64);
        let nearest = corners
            .iter()
            .map(|&(cx, cy)| ((col - cx).powi(2) + (row - cy).powi(2)).sqrt())
            .fold(f64::INFINITY, f64::min);
        nearest > radius
    })
}

/// Radius mask when a radius is given, otherwise the single-point DC mask.
pub fn create_mask(size: usize, radius: Option<f64>) -> Result<Mask> {
    match radius {
        Some(radius) => create_corner_mask(size, radius),
        None => create_dc_mask(size),
    }
}
