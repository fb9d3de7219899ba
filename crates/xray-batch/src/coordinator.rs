use std::path::Path;

use xray_enhance::{apply, list_techniques};
use xray_io::{functional::read_image_any_mono8, png::write_image_png_mono8, IoError};

use crate::{
    error::BatchError,
    result::{BatchResult, ImageResult},
};

/// Load an image file as 8-bit grayscale and run every registered technique on it.
///
/// Returns `None` when the file is missing or cannot be decoded; callers skip such images.
///
/// # Arguments
///
/// * `path` - The image file to process.
pub fn process_single(path: impl AsRef<Path>) -> Option<ImageResult> {
    let path = path.as_ref();

    let original = match read_image_any_mono8(path) {
        Ok(image) => image,
        Err(err) => {
            log::warn!("skipping {}: {}", path.display(), err);
            return None;
        }
    };

    let mut result = ImageResult::new(original);
    for technique in list_techniques() {
        // the registry only holds valid parameters, a failure here is a bug
        let processed = match apply(technique, &result.original().image) {
            Ok(image) => image,
            Err(err) => {
                log::error!("{} failed on {}: {}", technique, path.display(), err);
                return None;
            }
        };
        result.insert(technique.label(), processed);
    }

    log::info!(
        "processed {} ({}) with {} techniques",
        path.display(),
        result.original().image.size(),
        result.len() - 1
    );

    Some(result)
}

/// Process a list of image files one after the other.
///
/// Images that fail to load are left out. Entries are keyed by file name; when two paths
/// share a file name the later one overwrites the earlier entry.
///
/// # Arguments
///
/// * `paths` - The image files to process.
pub fn process_batch<P: AsRef<Path>>(paths: &[P]) -> BatchResult {
    let mut batch = BatchResult::new();

    for path in paths {
        let path = path.as_ref();
        let Some(result) = process_single(path) else {
            continue;
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        batch.insert(name, path, result);
    }

    log::info!("batch done: {} of {} images", batch.len(), paths.len());

    batch
}

/// Make a technique label usable in a file name.
///
/// Every character that is not an ASCII letter or digit becomes `_`.
///
/// # Example
///
/// ```
/// use xray_batch::sanitize_label;
///
/// assert_eq!(sanitize_label("CLAHE (clip=2.0, grid=8x8)"), "CLAHE__clip_2_0__grid_8x8_");
/// ```
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Write every image of a result as `{image_name}_{sanitized label}.png` into `output_dir`.
///
/// The directory is created when missing. Writing stops at the first failure; files written
/// before it stay on disk.
///
/// # Arguments
///
/// * `result` - The images to write.
/// * `output_dir` - The target directory.
/// * `image_name` - Prefix of every file name, usually the batch key of the image.
///
/// # Returns
///
/// The number of files written.
pub fn save_results(
    result: &ImageResult,
    output_dir: impl AsRef<Path>,
    image_name: &str,
) -> Result<usize, BatchError> {
    let output_dir = output_dir.as_ref();

    std::fs::create_dir_all(output_dir).map_err(|e| BatchError::Save {
        path: output_dir.to_path_buf(),
        source: IoError::FileError(e),
    })?;

    let mut written = 0;
    for output in result.iter() {
        let file_name = format!("{}_{}.png", image_name, sanitize_label(&output.label));
        let file_path = output_dir.join(file_name);

        if let Err(source) = write_image_png_mono8(&file_path, &output.image) {
            return Err(BatchError::Save {
                path: file_path,
                source,
            });
        }

        log::debug!("wrote {}", file_path.display());
        written += 1;
    }

    log::info!(
        "saved {} images of {} to {}",
        written,
        image_name,
        output_dir.display()
    );

    Ok(written)
}

/// Write every image of every batch entry into `output_dir`, named after the entry.
///
/// Stops at the first failure.
///
/// # Returns
///
/// The total number of files written.
pub fn save_batch(batch: &BatchResult, output_dir: impl AsRef<Path>) -> Result<usize, BatchError> {
    let output_dir = output_dir.as_ref();
    batch
        .iter()
        .try_fold(0, |total, entry| -> Result<usize, BatchError> {
            Ok(total + save_results(&entry.result, output_dir, &entry.name)?)
        })
}
