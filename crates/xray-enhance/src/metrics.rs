use serde::{Deserialize, Serialize};
use xray_image::GrayImage;
use xray_imgproc::core::image_stats;

/// Brightness and contrast statistics of a grayscale image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean intensity.
    pub mean_intensity: f64,
    /// Population standard deviation of the intensity.
    pub std_intensity: f64,
    /// Darkest intensity.
    pub min_intensity: u8,
    /// Brightest intensity.
    pub max_intensity: u8,
    /// `std_intensity / mean_intensity`, or zero for a black image.
    pub contrast: f64,
}

/// Compute the quality metrics of an image.
///
/// Never fails: a missing or empty image yields all-zero metrics.
///
/// # Example
///
/// ```
/// use xray_enhance::compute_metrics;
/// use xray_image::Image;
///
/// let image = Image::<u8, 1>::new([4, 1].into(), vec![10, 10, 30, 30]).unwrap();
/// let metrics = compute_metrics(Some(&image));
///
/// assert_eq!(metrics.mean_intensity, 20.0);
/// assert_eq!(metrics.std_intensity, 10.0);
/// assert_eq!(metrics.contrast, 0.5);
/// ```
pub fn compute_metrics(image: Option<&GrayImage>) -> Metrics {
    let Some(stats) = image.and_then(image_stats) else {
        return Metrics::default();
    };

    let contrast = if stats.mean > 0.0 {
        stats.std / stats.mean
    } else {
        0.0
    };

    Metrics {
        mean_intensity: stats.mean,
        std_intensity: stats.std,
        min_intensity: stats.min,
        max_intensity: stats.max,
        contrast,
    }
}

/// How a processed image compares to its original.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsComparison {
    /// Change of the mean intensity, processed minus original.
    pub brightness_delta: f64,
    /// Processed contrast over original contrast, zero when the original has no contrast.
    pub contrast_ratio: f64,
}

impl MetricsComparison {
    /// Compare the metrics of a processed image against the original ones.
    pub fn new(original: &Metrics, processed: &Metrics) -> Self {
        let contrast_ratio = if original.contrast > 0.0 {
            processed.contrast / original.contrast
        } else {
            0.0
        };

        Self {
            brightness_delta: processed.mean_intensity - original.mean_intensity,
            contrast_ratio,
        }
    }
}
