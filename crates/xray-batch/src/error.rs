use std::path::PathBuf;

/// An error type for batch processing.
#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    /// Writing the output directory or one of the output files failed.
    #[error("Failed to save {path}: {source}")]
    Save {
        /// The file or directory that could not be written.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: xray_io::IoError,
    },

    /// The background worker went away without delivering a result.
    #[error("The batch worker stopped without sending a result")]
    WorkerDisconnected,
}
