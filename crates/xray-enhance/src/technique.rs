use std::fmt;

use xray_image::{GrayImage, Image};
use xray_imgproc::{enhance, filter};

use crate::error::EnhanceError;

/// Label under which the unmodified input is stored next to the technique outputs.
pub const ORIGINAL_LABEL: &str = "original";

/// An enhancement technique together with its parameters.
///
/// Every variant maps a grayscale image to a new grayscale image of the same size.
/// The human-readable label is the [`fmt::Display`] output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Technique {
    /// Global histogram equalization.
    HistogramEqualization,
    /// Contrast limited adaptive histogram equalization.
    Clahe {
        /// Contrast limit relative to a flat histogram.
        clip_limit: f32,
        /// Number of tiles as (rows, cols).
        grid_size: (usize, usize),
    },
    /// Power law intensity remapping through a lookup table.
    Gamma {
        /// The gamma value; the output is `(input / 255) ^ (1 / gamma) * 255`.
        gamma: f64,
    },
    /// Gaussian smoothing with a square kernel and a sigma derived from its size.
    GaussianBlur {
        /// Side length of the kernel.
        kernel_size: usize,
    },
    /// Median filtering with a square window.
    MedianBlur {
        /// Side length of the window.
        kernel_size: usize,
    },
}

/// The registered techniques, in display order.
const TECHNIQUES: [Technique; 7] = [
    Technique::HistogramEqualization,
    Technique::Clahe {
        clip_limit: 2.0,
        grid_size: (8, 8),
    },
    Technique::Clahe {
        clip_limit: 4.0,
        grid_size: (16, 16),
    },
    Technique::Gamma { gamma: 0.5 },
    Technique::Gamma { gamma: 1.5 },
    Technique::GaussianBlur { kernel_size: 5 },
    Technique::MedianBlur { kernel_size: 5 },
];

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Technique::HistogramEqualization => write!(f, "Histogram Equalization"),
            Technique::Clahe {
                clip_limit,
                grid_size: (rows, cols),
            } => write!(f, "CLAHE (clip={clip_limit:.1}, grid={rows}x{cols})"),
            Technique::Gamma { gamma } => write!(f, "Gamma Correction (γ={gamma:.1})"),
            Technique::GaussianBlur { kernel_size } => {
                write!(f, "Gaussian Filter ({kernel_size}x{kernel_size})")
            }
            Technique::MedianBlur { kernel_size } => {
                write!(f, "Median Filter ({kernel_size}x{kernel_size})")
            }
        }
    }
}

impl Technique {
    /// Human-readable label of the technique.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Look up a registered technique by its label.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::UnknownTechnique`] when no registered technique has this label.
    pub fn from_label(label: &str) -> Result<Self, EnhanceError> {
        TECHNIQUES
            .iter()
            .find(|t| t.label() == label)
            .copied()
            .ok_or_else(|| EnhanceError::UnknownTechnique(label.to_string()))
    }

    fn invalid(&self, reason: impl Into<String>) -> EnhanceError {
        EnhanceError::InvalidParameter {
            technique: self.label(),
            reason: reason.into(),
        }
    }

    fn validate(&self) -> Result<(), EnhanceError> {
        match *self {
            Technique::Gamma { gamma } if !(gamma.is_finite() && gamma > 0.0) => {
                Err(self.invalid(format!("gamma must be positive, got {gamma}")))
            }
            Technique::Clahe {
                grid_size: (rows, cols),
                ..
            } if rows == 0 || cols == 0 => Err(self.invalid("tile grid must not be empty")),
            Technique::GaussianBlur { kernel_size } | Technique::MedianBlur { kernel_size }
                if kernel_size % 2 == 0 =>
            {
                Err(self.invalid(format!("kernel size must be odd, got {kernel_size}")))
            }
            _ => Ok(()),
        }
    }
}

/// The fixed, ordered registry of techniques.
pub fn list_techniques() -> &'static [Technique] {
    &TECHNIQUES
}

/// Labels of the registered techniques, in registry order.
pub fn technique_labels() -> Vec<String> {
    TECHNIQUES.iter().map(Technique::label).collect()
}

/// Apply a technique to an image, returning a new image of the same size.
///
/// The input is never modified.
///
/// # Example
///
/// ```
/// use xray_enhance::{apply, Technique};
/// use xray_image::Image;
///
/// let src = Image::<u8, 1>::new([4, 1].into(), vec![0, 64, 128, 255]).unwrap();
/// let dst = apply(&Technique::Gamma { gamma: 1.0 }, &src).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn apply(technique: &Technique, src: &GrayImage) -> Result<GrayImage, EnhanceError> {
    technique.validate()?;

    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    match *technique {
        Technique::HistogramEqualization => enhance::equalize_histogram(src, &mut dst)?,
        Technique::Clahe {
            clip_limit,
            grid_size,
        } => enhance::clahe(src, &mut dst, clip_limit, grid_size)?,
        Technique::Gamma { gamma } => enhance::adjust_gamma(src, &mut dst, gamma)?,
        Technique::GaussianBlur { kernel_size } => {
            filter::gaussian_blur(src, &mut dst, (kernel_size, kernel_size), (0.0, 0.0))?
        }
        Technique::MedianBlur { kernel_size } => filter::median_blur(src, &mut dst, kernel_size)?,
    }

    log::debug!("applied {} on a {} image", technique, src.size());

    Ok(dst)
}

/// Apply a registered technique, looked up by label.
///
/// # Errors
///
/// Returns [`EnhanceError::UnknownTechnique`] when the label is not registered.
pub fn apply_technique(label: &str, src: &GrayImage) -> Result<GrayImage, EnhanceError> {
    let technique = Technique::from_label(label)?;
    apply(&technique, src)
}
