// reference: https://www.strchr.com/standard_deviation_in_one_pass
use xray_image::Image;

/// Intensity statistics of a single channel 8-bit image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageStats {
    /// Mean intensity.
    pub mean: f64,
    /// Population standard deviation of the intensity.
    pub std: f64,
    /// Minimum intensity.
    pub min: u8,
    /// Maximum intensity.
    pub max: u8,
}

/// Compute mean, standard deviation, minimum and maximum of an image in one pass.
///
/// Returns `None` when the image holds no pixels.
///
/// # Example
///
/// ```
/// use xray_image::{Image, ImageSize};
/// use xray_imgproc::core::image_stats;
///
/// let image = Image::<u8, 1>::new(
///    ImageSize {
///      width: 2,
///      height: 2,
///    },
///    vec![0, 2, 4, 6],
/// ).unwrap();
///
/// let stats = image_stats(&image).unwrap();
///
/// assert_eq!(stats.mean, 3.0);
/// assert_eq!(stats.std, 5.0f64.sqrt());
/// assert_eq!((stats.min, stats.max), (0, 6));
/// ```
pub fn image_stats(image: &Image<u8, 1>) -> Option<ImageStats> {
    if image.is_empty() {
        return None;
    }

    let (sum, sq_sum, min, max) = image.as_slice().iter().fold(
        (0f64, 0f64, u8::MAX, u8::MIN),
        |(sum, sq_sum, min, max), &val| {
            let v = val as f64;
            (sum + v, sq_sum + v * v, min.min(val), max.max(val))
        },
    );

    let n = image.as_slice().len() as f64;
    let mean = sum / n;
    // rounding can push the variance slightly below zero
    let variance = (sq_sum / n - mean * mean).max(0.0);

    Some(ImageStats {
        mean,
        std: variance.sqrt(),
        min,
        max,
    })
}
