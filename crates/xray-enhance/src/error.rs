/// An error type for the enhancement engine.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EnhanceError {
    /// The requested label is not in the technique registry.
    #[error("Unknown technique: {0}")]
    UnknownTechnique(String),

    /// A technique parameter is outside its valid range.
    #[error("Invalid parameter for {technique}: {reason}")]
    InvalidParameter {
        /// Label of the technique.
        technique: String,
        /// What is wrong with the parameter.
        reason: String,
    },

    /// The underlying image operation failed.
    #[error(transparent)]
    Image(#[from] xray_image::ImageError),
}
