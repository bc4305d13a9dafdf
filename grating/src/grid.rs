use std::ops::{Deref, Index};
use std::slice;

use image::{GrayImage, Luma};

use crate::error::{GratingError, Result};

/// Square `size x size` buffer, flattened row-major (`index = y * size + x`).
///
/// Values are produced wholesale by a factory call and never mutated in place
/// afterwards; recomputation yields a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Square<T> {
    values: Vec<T>,
    size: usize,
}

/// Real-valued samples.
pub type Grid = Square<f64>;

/// `true` = included, `false` = excluded.
pub type Mask = Square<bool>;

/// 8-bit grayscale intensities.
pub type ByteGrid = Square<u8>;

impl<T> Square<T> {
    pub fn new(size: usize, values: Vec<T>) -> Result<Self> {
        if size == 0 {
            return Err(GratingError::ZeroSize);
        }
        if values.len() != size * size {
            return Err(GratingError::InvalidDimension {
                len: values.len(),
                size,
            });
        }
        Ok(Self { values, size })
    }

    /// For producers that already guarantee `values.len() == size * size`.
    pub(crate) fn from_transform(size: usize, values: Vec<T>) -> Self {
        debug_assert!(size > 0 && values.len() == size * size);
        Self { values, size }
    }

    /// Builds a buffer by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        if size == 0 {
            return Err(GratingError::ZeroSize);
        }
        let mut values = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                values.push(f(x, y));
            }
        }
        Ok(Self { values, size })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size);
        y * self.size + x
    }

    /// Raw `(x, y)` coordinates of a flat index.
    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.size, index / self.size)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.values[self.index_of(x, y)]
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.values.iter()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    /// Fails unless `other` has the same edge length.
    pub fn ensure_same_size<U>(&self, other: &Square<U>) -> Result<()> {
        if self.size != other.size {
            return Err(GratingError::SizeMismatch {
                expected: self.size,
                actual: other.size,
            });
        }
        Ok(())
    }
}

impl Grid {
    /// Converts decoded 8-bit samples into a grid.
    ///
    /// The image must be square with a power-of-two edge; decoding itself
    /// happens elsewhere.
    pub fn from_gray_image(image: &GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width != height {
            return Err(GratingError::NotSquare { width, height });
        }
        let size = width as usize;
        if !size.is_power_of_two() {
            return Err(GratingError::NotPowerOfTwo { size });
        }
        let values = image.as_raw().iter().map(|&v| v as f64).collect();
        Self::new(size, values)
    }
}

impl ByteGrid {
    /// Single-channel image with the same layout.
    pub fn to_gray_image(&self) -> GrayImage {
        let size = self.size as u32;
        GrayImage::from_fn(size, size, |x, y| Luma([self[(x as usize, y as usize)]]))
    }
}

impl<T> Index<(usize, usize)> for Square<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.values[y * self.size + x]
    }
}

impl<T> Index<usize> for Square<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}

impl<T> Deref for Square<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl<T> AsRef<[T]> for Square<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.values
    }
}

impl<'a, T> IntoIterator for &'a Square<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T> From<Square<T>> for Vec<T> {
    #[inline]
    fn from(square: Square<T>) -> Self {
        square.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_length_against_size() {
        let grid = Grid::new(2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.len(), 4);

        assert_eq!(
            Grid::new(3, vec![0.0; 8]),
            Err(GratingError::InvalidDimension { len: 8, size: 3 })
        );
        assert_eq!(Grid::new(0, vec![]), Err(GratingError::ZeroSize));
    }

    #[test]
    fn from_fn_is_row_major() {
        let grid = Square::from_fn(3, |x, y| y * 10 + x).unwrap();
        assert_eq!(grid.values(), &[0, 1, 2, 10, 11, 12, 20, 21, 22]);
        assert_eq!(grid[(2, 1)], 12);
        assert_eq!(*grid.get(0, 2), 20);
        assert_eq!(grid.index_of(1, 2), 7);
        assert_eq!(grid.coords_of(7), (1, 2));
    }

    #[test]
    fn ensure_same_size_reports_mismatch() {
        let a = Grid::new(2, vec![0.0; 4]).unwrap();
        let b = Mask::new(4, vec![true; 16]).unwrap();
        assert!(a.ensure_same_size(&a).is_ok());
        assert_eq!(
            a.ensure_same_size(&b),
            Err(GratingError::SizeMismatch {
                expected: 2,
                actual: 4
            })
        );
    }

    #[test]
    fn from_gray_image_converts_samples() {
        let image = GrayImage::from_raw(2, 2, vec![0, 64, 128, 255]).unwrap();
        let grid = Grid::from_gray_image(&image).unwrap();
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.values(), &[0.0, 64.0, 128.0, 255.0]);
    }

    #[test]
    fn byte_grid_to_gray_image_keeps_layout() {
        let bytes = ByteGrid::new(2, vec![1, 2, 3, 4]).unwrap();
        let image = bytes.to_gray_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 0).0, [2]);
        assert_eq!(image.get_pixel(0, 1).0, [3]);
        assert_eq!(
            Grid::from_gray_image(&image).unwrap().values(),
            &[1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn from_gray_image_rejects_bad_shapes() {
        let wide = GrayImage::new(4, 2);
        assert_eq!(
            Grid::from_gray_image(&wide),
            Err(GratingError::NotSquare {
                width: 4,
                height: 2
            })
        );

        let odd = GrayImage::new(6, 6);
        assert_eq!(
            Grid::from_gray_image(&odd),
            Err(GratingError::NotPowerOfTwo { size: 6 })
        );
    }
}
