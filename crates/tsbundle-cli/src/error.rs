//! Error conversion utilities for CLI.
//!
//! Converts tsbundle-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use tsbundle_core::ExtractionError;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, bundle: &Path) -> anyhow::Error {
    match err {
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}\n\
                 HINT: Check that the file exists and that its directory is writable.",
                bundle.display(),
                io_err
            )
        }
        ExtractionError::UnsupportedFormat { .. } => {
            anyhow!(
                "Bundle format not supported: {}\n\
                 HINT: Supported formats: zip, tar.gz, tgz",
                bundle.display()
            )
        }
        ExtractionError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid bundle '{}': {}\n\
                 HINT: The bundle may be truncated or corrupted. Try collecting it again.",
                bundle.display(),
                reason
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing bundle '{}'", bundle.display())),
    }
}

/// Adds context to a generic error about bundle operations
pub fn add_bundle_context<T>(
    result: Result<T, ExtractionError>,
    bundle: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, bundle))
}
