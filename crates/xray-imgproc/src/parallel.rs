use rayon::prelude::*;

use xray_image::Image;

/// Apply a function to each pixel in the image in parallel with a value.
///
/// Rows are distributed over the rayon thread pool.
pub fn par_iter_rows_val<T1, T2, const C: usize>(
    src: &Image<T1, C>,
    dst: &mut Image<T2, C>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    if src.is_empty() {
        return;
    }

    let row_len = C * src.cols();
    src.as_slice()
        .par_chunks_exact(row_len)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(row_len))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Fill the rows of an image in parallel, passing the row index to the closure.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    if dst.is_empty() {
        return;
    }

    let row_len = C * dst.cols();
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(row, dst_row)| f(row, dst_row));
}

#[cfg(test)]
mod tests {
    use xray_image::{Image, ImageError};

    #[test]
    fn test_par_iter_rows_val() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([2, 2].into(), vec![1, 2, 3, 4])?;
        let mut dst = Image::<u16, 1>::from_size_val(src.size(), 0)?;
        super::par_iter_rows_val(&src, &mut dst, |&s, d| *d = s as u16 * 100);
        assert_eq!(dst.as_slice(), &[100, 200, 300, 400]);
        Ok(())
    }

    #[test]
    fn test_par_iter_rows_indexed() -> Result<(), ImageError> {
        let mut dst = Image::<usize, 1>::from_size_val([3, 2].into(), 0)?;
        super::par_iter_rows_indexed(&mut dst, |row, dst_row| {
            dst_row.iter_mut().for_each(|v| *v = row);
        });
        assert_eq!(dst.as_slice(), &[0, 0, 0, 1, 1, 1]);
        Ok(())
    }

    #[test]
    fn test_empty_image_is_noop() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([0, 0].into(), vec![])?;
        let mut dst = Image::<u8, 1>::new([0, 0].into(), vec![])?;
        super::par_iter_rows_val(&src, &mut dst, |&s, d| *d = s);
        assert!(dst.is_empty());
        Ok(())
    }
}
