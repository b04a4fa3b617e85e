//! Error Types
//!
//! Export itself never fails on scene content: registration failures,
//! policy skips and unknown field types are reported through the boolean
//! success result and the log. [`ExportError`] is reserved for misuse of a
//! consumed exporter and for failures while persisting the document.
//!
//! ```rust,ignore
//! use sylva_export::errors::{ExportError, Result};
//!
//! fn export_main(exporter: &mut SceneExporter<GltfWriter>, scene: &Scene) -> Result<bool> {
//!     exporter.export(scene, &scene.root_nodes, None, Some("Main"))
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// The writer was already handed off by `finalize`.
    #[error("Exporter has already been finalized")]
    AlreadyFinalized,

    /// Finalization was aborted before the document was written.
    #[error("Finalization was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `std::result::Result<T, ExportError>`.
pub type Result<T> = std::result::Result<T, ExportError>;
