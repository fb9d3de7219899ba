use std::path::Path;

use xray_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as 8-bit grayscale.
///
/// The method tries to read from any image format supported by the image crate, guessing
/// the format from the file content. Color images are converted to luma.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A single channel image containing the intensities.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] for a missing file and
/// [`IoError::ImageDecodeError`] when the content is not a decodable image.
pub fn read_image_any_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;

    let img = image::ImageReader::new(std::io::Cursor::new(&bytes))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::trace!(
        "decoded {} as {:?} ({})",
        file_path.display(),
        img.color(),
        size
    );

    Ok(Image::new(size, img.into_luma8().into_raw())?)
}
