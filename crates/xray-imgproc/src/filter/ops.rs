use xray_image::{Image, ImageError};

use super::{kernels, separable_filter};
use crate::parallel;

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The size of the kernel (kernel_x, kernel_y).
/// * `sigma` - The sigma of the gaussian kernel. Zero or negative values derive the
///   sigma from the kernel size.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel_size: (usize, usize),
    sigma: (f32, f32),
) -> Result<(), ImageError> {
    for k in [kernel_size.0, kernel_size.1] {
        if k == 0 || k % 2 == 0 {
            return Err(ImageError::InvalidKernelSize(k));
        }
    }

    let kernel_x = kernels::gaussian_kernel_1d(kernel_size.0, sigma.0);
    let kernel_y = kernels::gaussian_kernel_1d(kernel_size.1, sigma.1);
    separable_filter(src, dst, &kernel_x, &kernel_y)
}

/// Blur an image using a median filter.
///
/// Each output pixel is the median of the `kernel_size x kernel_size` neighborhood around it.
/// Pixels outside the image are clamped to the nearest edge.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dst` - The destination image with shape (H, W).
/// * `kernel_size` - The odd side length of the square window.
pub fn median_blur(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let rows = src.rows() as isize;
    let cols = src.cols() as isize;
    let radius = (kernel_size / 2) as isize;
    let src_data = src.as_slice();

    parallel::par_iter_rows_indexed(dst, |r, dst_row| {
        let mut window = Vec::with_capacity(kernel_size * kernel_size);
        for (c, dst_val) in dst_row.iter_mut().enumerate() {
            window.clear();
            for dy in -radius..=radius {
                let y = (r as isize + dy).clamp(0, rows - 1) as usize;
                for dx in -radius..=radius {
                    let x = (c as isize + dx).clamp(0, cols - 1) as usize;
                    window.push(src_data[y * cols as usize + x]);
                }
            }
            let mid = window.len() / 2;
            *dst_val = *window.select_nth_unstable(mid).1;
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xray_image::ImageSize;

    #[test]
    fn test_gaussian_blur_constant() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([6, 4].into(), 120)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        gaussian_blur(&src, &mut dst, (5, 5), (0.0, 0.0))?;
        assert!(dst.as_slice().iter().all(|&v| v == 120));
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_impulse() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };
        let mut data = vec![0u8; 25];
        data[12] = 255;
        let src = Image::<u8, 1>::new(size, data)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        gaussian_blur(&src, &mut dst, (5, 5), (0.0, 0.0))?;

        // 255 * 0.375 * 0.375
        assert_eq!(dst.get_pixel(2, 2, 0)?, 36);
        // the mirrored border folds both outer taps onto the impulse: 255 * 0.125 * 0.125
        assert_eq!(dst.get_pixel(0, 0, 0)?, 4);
        assert_eq!(dst.get_pixel(1, 2, 0)?, dst.get_pixel(3, 2, 0)?);
        Ok(())
    }

    #[test]
    fn test_gaussian_blur_invalid_kernel() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = src.clone();
        assert_eq!(
            gaussian_blur(&src, &mut dst, (4, 5), (0.0, 0.0)),
            Err(ImageError::InvalidKernelSize(4))
        );
        Ok(())
    }

    #[test]
    fn test_median_blur_salt_and_pepper() -> Result<(), ImageError> {
        let mut data = vec![100u8; 49];
        data[8] = 255;
        data[24] = 0;
        data[40] = 255;
        let src = Image::<u8, 1>::new([7, 7].into(), data)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        median_blur(&src, &mut dst, 5)?;
        assert!(dst.as_slice().iter().all(|&v| v == 100));
        Ok(())
    }

    #[test]
    fn test_median_blur_matches_imageproc() -> Result<(), Box<dyn std::error::Error>> {
        use rand::Rng;

        let (width, height) = (23u32, 17u32);
        let mut rng = rand::rng();
        let data: Vec<u8> = (0..width * height).map(|_| rng.random()).collect();

        let reference = image::GrayImage::from_raw(width, height, data.clone());
        let reference = reference.ok_or("invalid buffer")?;
        let expected = imageproc::filter::median_filter(&reference, 2, 2);

        let src = Image::<u8, 1>::new([width as usize, height as usize].into(), data)?;
        let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0)?;
        median_blur(&src, &mut dst, 5)?;

        assert_eq!(dst.as_slice(), expected.as_raw().as_slice());
        Ok(())
    }
}
