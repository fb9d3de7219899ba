use rayon::prelude::*;
use xray_image::{Image, ImageError};

use crate::{border::reflect_101, histogram, parallel};

/// A lookup table mapping every 8-bit intensity to a new one.
pub type Lut = [u8; 256];

fn check_same_size(src: &Image<u8, 1>, dst: &Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Remap the intensities of an image through a lookup table.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `lut` - The 256-entry lookup table.
pub fn apply_lut(src: &Image<u8, 1>, dst: &mut Image<u8, 1>, lut: &Lut) -> Result<(), ImageError> {
    check_same_size(src, dst)?;
    parallel::par_iter_rows_val(src, dst, |&src_pixel, dst_pixel| {
        *dst_pixel = lut[src_pixel as usize];
    });
    Ok(())
}

/// Build the gamma correction lookup table.
///
/// Each entry is `((i / 255) ^ (1 / gamma)) * 255`, truncated to 8 bits.
/// With the exponent `1 / gamma`, a gamma below one darkens the image and above one brightens it.
pub fn gamma_lut(gamma: f64) -> Lut {
    let inv_gamma = 1.0 / gamma;
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = ((i as f64 / 255.0).powf(inv_gamma) * 255.0) as u8;
    }
    lut
}

/// Apply gamma correction to an image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `gamma` - The gamma value, must be positive.
///
/// # Example
///
/// ```
/// use xray_image::Image;
/// use xray_imgproc::enhance::adjust_gamma;
///
/// let src = Image::<u8, 1>::new([4, 1].into(), vec![0, 64, 128, 255]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// adjust_gamma(&src, &mut dst, 1.0).unwrap();
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn adjust_gamma(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    gamma: f64,
) -> Result<(), ImageError> {
    apply_lut(src, dst, &gamma_lut(gamma))
}

/// Equalize the histogram of a grayscale image.
///
/// The intensities are remapped through the normalized cumulative distribution so the
/// output histogram is as flat as possible. The darkest populated intensity maps to 0 and
/// the brightest to 255. A constant image is returned unchanged.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
pub fn equalize_histogram(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    let total = src.as_slice().len();
    if total == 0 {
        return Ok(());
    }

    let mut cdf = histogram::histogram_256(src)?;

    // first populated bin
    let first = cdf.iter().position(|&h| h > 0).unwrap_or(0);
    let first_count = cdf[first];
    if first_count == total {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    histogram::cumulative_sum(&mut cdf);

    let scale = 255.0 / (total - first_count) as f64;
    let mut lut = [0u8; 256];
    for (entry, &acc) in lut.iter_mut().zip(cdf.iter()).skip(first) {
        let val = (acc - first_count) as f64 * scale;
        *entry = val.round().clamp(0.0, 255.0) as u8;
    }

    apply_lut(src, dst, &lut)
}

/// Build the lookup table of one CLAHE tile.
///
/// The histogram is clipped at `clip` and the excess spread uniformly over all bins,
/// with the remainder distributed on a regular stride.
fn clahe_tile_lut(hist: &mut [usize; 256], clip: Option<usize>, tile_area: usize) -> Lut {
    if let Some(clip) = clip {
        let mut clipped = 0;
        for h in hist.iter_mut() {
            if *h > clip {
                clipped += *h - clip;
                *h = clip;
            }
        }

        let redist_batch = clipped / 256;
        let mut residual = clipped - redist_batch * 256;
        hist.iter_mut().for_each(|h| *h += redist_batch);

        if residual > 0 {
            let residual_step = (256 / residual).max(1);
            let mut i = 0;
            while i < 256 && residual > 0 {
                hist[i] += 1;
                i += residual_step;
                residual -= 1;
            }
        }
    }

    let lut_scale = 255.0 / tile_area as f32;
    let mut lut = [0u8; 256];
    let mut sum = 0usize;
    for (entry, &h) in lut.iter_mut().zip(hist.iter()) {
        sum += h;
        *entry = (sum as f32 * lut_scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Contrast limited adaptive histogram equalization.
///
/// The image is divided into a `rows x cols` grid of tiles. Each tile gets its own
/// equalization table, built from a histogram whose bins are capped at
/// `clip_limit * tile_area / 256` (at least one). Every output pixel blends the tables of
/// the four nearest tile centers bilinearly, so tile borders do not show.
///
/// When the image size is not a multiple of the grid, the tiles are computed on a copy
/// extended at the bottom and right by mirroring. A non positive `clip_limit` disables
/// clipping.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `clip_limit` - The contrast limit, relative to a flat histogram.
/// * `grid_size` - The number of tiles as (rows, cols).
///
/// # Errors
///
/// Returns an error if the sizes differ or the grid has a zero dimension.
pub fn clahe(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    clip_limit: f32,
    grid_size: (usize, usize),
) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    let (tiles_y, tiles_x) = grid_size;
    if tiles_y == 0 || tiles_x == 0 {
        return Err(ImageError::InvalidTileGrid(tiles_y, tiles_x));
    }

    if src.is_empty() {
        return Ok(());
    }

    let (width, height) = (src.cols(), src.rows());
    let ext_width = width.div_ceil(tiles_x) * tiles_x;
    let ext_height = height.div_ceil(tiles_y) * tiles_y;
    let tile_width = ext_width / tiles_x;
    let tile_height = ext_height / tiles_y;
    let tile_area = tile_width * tile_height;

    let src_data = src.as_slice();
    let ext_pixel = |x: usize, y: usize| -> u8 {
        let sx = reflect_101(x as isize, width);
        let sy = reflect_101(y as isize, height);
        src_data[sy * width + sx]
    };

    let clip = (clip_limit > 0.0).then(|| {
        let clip = clip_limit * tile_area as f32 / 256.0;
        (clip as usize).max(1)
    });

    let luts: Vec<Lut> = (0..tiles_x * tiles_y)
        .into_par_iter()
        .map(|tile| {
            let (ty, tx) = (tile / tiles_x, tile % tiles_x);
            let mut hist = [0usize; 256];
            for y in ty * tile_height..(ty + 1) * tile_height {
                for x in tx * tile_width..(tx + 1) * tile_width {
                    hist[ext_pixel(x, y) as usize] += 1;
                }
            }
            clahe_tile_lut(&mut hist, clip, tile_area)
        })
        .collect();

    // position of a coordinate relative to the tile centers: lower tile, upper tile, weight
    let neighbours = |pos: usize, tile_len: usize, num_tiles: usize| -> (usize, usize, f32) {
        let f = pos as f32 / tile_len as f32 - 0.5;
        let lower = f.floor();
        let weight = f - lower;
        let lower = lower as isize;
        let t1 = lower.max(0) as usize;
        let t2 = ((lower + 1) as usize).min(num_tiles - 1);
        (t1, t2, weight)
    };

    let x_neighbours: Vec<(usize, usize, f32)> = (0..width)
        .map(|x| neighbours(x, tile_width, tiles_x))
        .collect();

    parallel::par_iter_rows_indexed(dst, |y, dst_row| {
        let (ty1, ty2, ya) = neighbours(y, tile_height, tiles_y);
        let src_row = &src_data[y * width..(y + 1) * width];

        for ((dst_val, &v), &(tx1, tx2, xa)) in dst_row
            .iter_mut()
            .zip(src_row.iter())
            .zip(x_neighbours.iter())
        {
            let v = v as usize;
            let lut_at = |ty: usize, tx: usize| luts[ty * tiles_x + tx][v] as f32;
            let top = lut_at(ty1, tx1) * (1.0 - xa) + lut_at(ty1, tx2) * xa;
            let bottom = lut_at(ty2, tx1) * (1.0 - xa) + lut_at(ty2, tx2) * xa;
            let res = top * (1.0 - ya) + bottom * ya;
            *dst_val = res.round().clamp(0.0, 255.0) as u8;
        }
    });

    Ok(())
}
