use rayon::prelude::*;
use xray_image::{Image, ImageError};

use crate::border::reflect_101;

/// Trait for floating point casting
pub trait FloatConversion {
    /// Convert the type to f32
    fn to_f32(&self) -> f32;
    /// Convert the type from f32
    fn from_f32(val: f32) -> Self;
}

impl FloatConversion for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }

    fn from_f32(val: f32) -> Self {
        val
    }
}

impl FloatConversion for u8 {
    fn to_f32(&self) -> f32 {
        *self as f32
    }

    fn from_f32(val: f32) -> Self {
        val.round().clamp(0.0, 255.0) as u8
    }
}

/// Apply a separable filter to an image.
///
/// The horizontal kernel is applied first into a f32 buffer, then the vertical kernel.
/// Borders are handled by mirroring (reflect 101).
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
///
/// # Errors
///
/// Returns an error if `src` and `dst` differ in size or a kernel has even length.
pub fn separable_filter<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError>
where
    T: FloatConversion + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    for kernel in [kernel_x, kernel_y] {
        if kernel.len() % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(kernel.len()));
        }
    }

    if src.is_empty() {
        return Ok(());
    }

    let rows = src.rows();
    let cols = src.cols();
    let row_len = cols * C;
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;
    let src_data = src.as_slice();

    // horizontal pass
    let mut temp = vec![0.0f32; src_data.len()];
    temp.par_chunks_exact_mut(row_len)
        .zip(src_data.par_chunks_exact(row_len))
        .for_each(|(temp_row, src_row)| {
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (i, &k) in kernel_x.iter().enumerate() {
                    let x = reflect_101(c as isize + i as isize - half_x, cols);
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += src_row[x * C + ch].to_f32() * k;
                    }
                }
                temp_row[c * C..(c + 1) * C].copy_from_slice(&acc);
            }
        });

    // vertical pass
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for (i, dst_val) in dst_row.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (j, &k) in kernel_y.iter().enumerate() {
                    let y = reflect_101(r as isize + j as isize - half_y, rows);
                    acc += temp[y * row_len + i] * k;
                }
                *dst_val = T::from_f32(acc);
            }
        });

    Ok(())
}
