use std::path::PathBuf;

/// Errors that can occur while rendering a chart
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Output path could not be written (permissions, missing directory, full disk)
    #[error("Failed to write chart to {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Plotting backend failed before anything was written
    #[error("Drawing error: {0}")]
    DrawingError(String),
}
