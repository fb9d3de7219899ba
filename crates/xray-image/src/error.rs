/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size and channels.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images are expected to have the same size.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel coordinate falls outside the image.
    #[error("Pixel index ({0}, {1}) out of bounds for image of size ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the requested channel does not exist.
    #[error("Channel index {0} out of bounds, the image has {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the number of histogram bins is not supported.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when a filter kernel size is not odd or is zero.
    #[error("Invalid kernel size {0}, expected an odd positive value")]
    InvalidKernelSize(usize),

    /// Error when a tile grid has a zero dimension.
    #[error("Invalid tile grid ({0}x{1}), both dimensions must be positive")]
    InvalidTileGrid(usize, usize),
}
