use std::path::{Path, PathBuf};

use serde::Serialize;
use xray_enhance::{compute_metrics, Metrics, MetricsComparison, ORIGINAL_LABEL};
use xray_image::GrayImage;

/// One labeled image of an [`ImageResult`] together with its metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct TechniqueOutput {
    /// Technique label, or [`ORIGINAL_LABEL`] for the unmodified input.
    pub label: String,
    /// The image produced under this label.
    pub image: GrayImage,
    /// Metrics of `image`.
    pub metrics: Metrics,
}

/// All the images produced from one source image, in insertion order.
///
/// The first entry is always the unmodified input under [`ORIGINAL_LABEL`]. Every entry
/// holds both its image and its metrics, and all images share the original's size.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageResult {
    outputs: Vec<TechniqueOutput>,
}

impl ImageResult {
    /// Start a result from the unmodified input.
    pub fn new(original: GrayImage) -> Self {
        let metrics = compute_metrics(Some(&original));
        Self {
            outputs: vec![TechniqueOutput {
                label: ORIGINAL_LABEL.to_string(),
                image: original,
                metrics,
            }],
        }
    }

    /// Add the output of a technique, computing its metrics.
    ///
    /// A label that is already present is replaced in place.
    pub(crate) fn insert(&mut self, label: impl Into<String>, image: GrayImage) {
        debug_assert_eq!(image.size(), self.original().image.size());

        let output = TechniqueOutput {
            label: label.into(),
            metrics: compute_metrics(Some(&image)),
            image,
        };

        match self.outputs.iter_mut().find(|o| o.label == output.label) {
            Some(existing) => *existing = output,
            None => self.outputs.push(output),
        }
    }

    /// The unmodified input.
    pub fn original(&self) -> &TechniqueOutput {
        &self.outputs[0]
    }

    /// The output stored under `label`.
    pub fn get(&self, label: &str) -> Option<&TechniqueOutput> {
        self.outputs.iter().find(|o| o.label == label)
    }

    /// The image stored under `label`.
    pub fn image(&self, label: &str) -> Option<&GrayImage> {
        self.get(label).map(|o| &o.image)
    }

    /// The metrics stored under `label`.
    pub fn metrics(&self, label: &str) -> Option<&Metrics> {
        self.get(label).map(|o| &o.metrics)
    }

    /// Compare the output under `label` against the original.
    pub fn comparison(&self, label: &str) -> Option<MetricsComparison> {
        self.metrics(label)
            .map(|processed| MetricsComparison::new(&self.original().metrics, processed))
    }

    /// Labels in insertion order, starting with [`ORIGINAL_LABEL`].
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|o| o.label.as_str())
    }

    /// Iterate over all outputs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TechniqueOutput> {
        self.outputs.iter()
    }

    /// Number of stored outputs, the original included.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Always false, the original is always present.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// The result of one source image within a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchEntry {
    /// File name of the source image, the key of the entry.
    pub name: String,
    /// Path the source image was read from.
    pub path: PathBuf,
    /// Images and metrics produced from the source.
    pub result: ImageResult,
}

/// Results of a batch run keyed by source file name, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    /// Create an empty batch result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result of an image.
    ///
    /// An entry with the same name is overwritten and keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, path: impl AsRef<Path>, result: ImageResult) {
        let entry = BatchEntry {
            name: name.into(),
            path: path.as_ref().to_path_buf(),
            result,
        };

        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => {
                log::warn!(
                    "{} replaces the earlier result from {}",
                    entry.path.display(),
                    existing.path.display()
                );
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
    }

    /// The entry stored under `name`.
    pub fn get(&self, name: &str) -> Option<&BatchEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter()
    }

    /// Number of images in the batch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no image made it into the batch.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The metrics of every image and label, without the pixel data.
    pub fn metrics_report(&self) -> Vec<ImageMetricsReport> {
        self.entries
            .iter()
            .map(|entry| ImageMetricsReport {
                name: entry.name.clone(),
                path: entry.path.clone(),
                metrics: entry
                    .result
                    .iter()
                    .map(|o| LabeledMetrics {
                        label: o.label.clone(),
                        metrics: o.metrics,
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Serializable metrics of one label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabeledMetrics {
    /// Technique label.
    pub label: String,
    /// Metrics of the image under `label`.
    pub metrics: Metrics,
}

/// Serializable metrics of one batch entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageMetricsReport {
    /// File name of the source image.
    pub name: String,
    /// Path of the source image.
    pub path: PathBuf,
    /// Metrics per label, in insertion order.
    pub metrics: Vec<LabeledMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use xray_image::{Image, ImageError};

    #[test]
    fn test_image_result_starts_with_original() -> Result<(), ImageError> {
        let original = Image::<u8, 1>::from_size_val([4, 4].into(), 9)?;
        let result = ImageResult::new(original.clone());
        assert_eq!(result.len(), 1);
        assert_eq!(result.original().label, ORIGINAL_LABEL);
        assert_eq!(result.image(ORIGINAL_LABEL), Some(&original));
        assert_eq!(
            result.metrics(ORIGINAL_LABEL).map(|m| m.mean_intensity),
            Some(9.0)
        );
        Ok(())
    }

    #[test]
    fn test_image_result_insert_replaces() -> Result<(), ImageError> {
        let original = Image::<u8, 1>::from_size_val([2, 2].into(), 10)?;
        let mut result = ImageResult::new(original);
        result.insert("brighter", Image::from_size_val([2, 2].into(), 20)?);
        result.insert("darker", Image::from_size_val([2, 2].into(), 5)?);
        result.insert("brighter", Image::from_size_val([2, 2].into(), 30)?);

        assert_eq!(
            result.labels().collect::<Vec<_>>(),
            vec![ORIGINAL_LABEL, "brighter", "darker"]
        );
        assert_eq!(
            result.metrics("brighter").map(|m| m.mean_intensity),
            Some(30.0)
        );

        let cmp = result.comparison("darker").expect("darker is present");
        assert_eq!(cmp.brightness_delta, -5.0);
        assert!(result.comparison("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_batch_result_overwrites_in_place() -> Result<(), ImageError> {
        let make = |v: u8| -> Result<ImageResult, ImageError> {
            Ok(ImageResult::new(Image::from_size_val([1, 1].into(), v)?))
        };

        let mut batch = BatchResult::new();
        batch.insert("a.png", "/one/a.png", make(1)?);
        batch.insert("b.png", "/one/b.png", make(2)?);
        batch.insert("a.png", "/two/a.png", make(3)?);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.names().collect::<Vec<_>>(), vec!["a.png", "b.png"]);

        let a = batch.get("a.png").expect("a.png is present");
        assert_eq!(a.path, PathBuf::from("/two/a.png"));
        assert_eq!(a.result.original().metrics.mean_intensity, 3.0);
        Ok(())
    }

    #[test]
    fn test_metrics_report() -> Result<(), ImageError> {
        let mut result = ImageResult::new(Image::from_size_val([2, 1].into(), 4)?);
        result.insert("flat", Image::from_size_val([2, 1].into(), 8)?);

        let mut batch = BatchResult::new();
        batch.insert("c.png", "c.png", result);

        let report = batch.metrics_report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].name, "c.png");
        let labels: Vec<_> = report[0].metrics.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec![ORIGINAL_LABEL, "flat"]);
        assert_eq!(report[0].metrics[1].metrics.mean_intensity, 8.0);
        Ok(())
    }
}
