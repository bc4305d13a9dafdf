//! Conversion of arbitrary real grids into 8-bit grayscale.
//!
//! The lowest included value maps to 0 and the highest to 255, either
//! linearly or logarithmically. Masked-out cells are left out of the range
//! computation and always map to 0. Byte values are truncated, not rounded.
//!
//! A grid whose included values span no range (uniform input, or nothing
//! included at all) normalizes to all zeros.


use std::f64::consts::E;

use image::GrayImage;

use crate::error::Result;
use crate::grid::{ByteGrid, Grid, Mask};

/// Maps `grid` to bytes. `mask`, when given, must match the grid size.
pub fn normalize_to_bytes(
    grid: &Grid,
    mask: Option<&Mask>,
    logarithmic: bool,
) -> Result<ByteGrid> {
    if let Some(mask) = mask {
        grid.ensure_same_size(mask)?;
    }

    let mask = mask.map(|m| m.values());
    let bytes = if logarithmic {
        normalize_log(grid.values(), mask)
    } else {
        normalize_linear(grid.values(), mask)
    };

    ByteGrid::new(grid.size(), bytes)
}

/// Same as [`normalize_to_bytes`], wrapped into a single-channel image for display.
pub fn normalize_to_image(
    grid: &Grid,
    mask: Option<&Mask>,
    logarithmic: bool,
) -> Result<GrayImage> {
    Ok(normalize_to_bytes(grid, mask, logarithmic)?.to_gray_image())
}

#[inline]
fn included(mask: Option<&[bool]>, i: usize) -> bool {
    mask.map_or(true, |m| m[i])
}

/// `(v - min) * 255 / (max - min)` over included cells.
pub fn normalize_linear(values: &[f64], mask: Option<&[bool]>) -> Vec<u8> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if included(mask, i) {
            min = min.min(v);
            max = max.max(v);
        }
    }

    if max <= min || !(max - min).is_finite() {
        tracing::debug!(min, max, "Degenerate range, normalizing to zeros");
        return vec![0; values.len()];
    }

    let scale = 255.0 / (max - min);
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if included(mask, i) {
                ((v - min) * scale) as u8
            } else {
                0
            }
        })
        .collect()
}

/// `ln(v - min + e) - 1`, scaled so the largest included value maps to 255.
///
/// The offset by `e` keeps the logarithm's argument at or above `e` for every
/// included cell, so the transformed minimum is exactly 0.
pub fn normalize_log(values: &[f64], mask: Option<&[bool]>) -> Vec<u8> {
    let mut min = f64::INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if included(mask, i) {
            min = min.min(v);
        }
    }

    if !min.is_finite() {
        tracing::debug!(min, "No finite minimum, normalizing to zeros");
        return vec![0; values.len()];
    }

    let g: Vec<f64> = values.iter().map(|&v| (v - min + E).ln() - 1.0).collect();

    let mut g_max = f64::NEG_INFINITY;
    for (i, &gv) in g.iter().enumerate() {
        if included(mask, i) {
            g_max = g_max.max(gv);
        }
    }

    if g_max <= 0.0 || !g_max.is_finite() {
        tracing::debug!(g_max, "Degenerate logarithmic range, normalizing to zeros");
        return vec![0; values.len()];
    }

    g.iter()
        .enumerate()
        .map(|(i, &gv)| {
            if included(mask, i) {
                (gv / g_max * 255.0) as u8
            } else {
                0
            }
        })
        .collect()
}
