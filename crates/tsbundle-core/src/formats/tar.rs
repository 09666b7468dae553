//! Gzip-compressed tar container handler.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;

use crate::ExpandConfig;
use crate::ExtractionError;
use crate::Result;
use crate::UnpackReport;
use crate::config::EntryFilter;

use super::traits::ContainerFormat;

/// Gzip-compressed tar container handler.
pub struct TarGzContainer<R: Read> {
    archive: tar::Archive<GzDecoder<R>>,
}

impl TarGzContainer<BufReader<File>> {
    /// Opens a `.tar.gz` container on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> TarGzContainer<R> {
    /// Wraps a reader holding a gzip-compressed tar stream.
    ///
    /// Entry metadata is applied as stored: permissions and modification
    /// times are preserved and existing files are overwritten.
    #[must_use]
    pub fn new(reader: R) -> Self {
        let mut archive = tar::Archive::new(GzDecoder::new(reader));
        archive.set_preserve_permissions(true);
        archive.set_preserve_mtime(true);
        archive.set_overwrite(true);
        Self { archive }
    }
}

impl<R: Read> ContainerFormat for TarGzContainer<R> {
    fn unpack(&mut self, output_dir: &Path, config: &ExpandConfig) -> Result<UnpackReport> {
        let mut report = UnpackReport::new();

        let entries = self.archive.entries().map_err(|e| {
            ExtractionError::InvalidArchive(format!("failed to read TAR entries: {e}"))
        })?;

        for entry_result in entries {
            let mut entry = entry_result.map_err(|e| {
                ExtractionError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;

            let path = entry
                .path()
                .map_err(|e| ExtractionError::InvalidArchive(format!("invalid path: {e}")))?
                .into_owned();
            let is_dir = entry.header().entry_type().is_dir();

            let written = match config.entry_filter {
                EntryFilter::PassThrough => {
                    let target = verbatim_target(output_dir, &path);
                    if target != output_dir {
                        if let Some(parent) = target.parent() {
                            fs::create_dir_all(parent)?;
                        }
                        entry.unpack(&target).map_err(|e| unpack_error(&path, &e))?;
                    }
                    true
                }
                EntryFilter::Contained => {
                    !path.components().any(|c| c == Component::ParentDir)
                        && entry
                            .unpack_in(output_dir)
                            .map_err(|e| unpack_error(&path, &e))?
                }
            };

            if !written {
                report.skip(format!(
                    "TAR entry escapes extraction directory: {}",
                    path.display()
                ));
            } else if is_dir {
                report.directories_created += 1;
            } else {
                report.files_extracted += 1;
            }
        }

        Ok(report)
    }

    fn format_name(&self) -> &str {
        "tar.gz"
    }
}

/// Joins an entry path onto `output_dir` keeping `..` components as-is.
fn verbatim_target(output_dir: &Path, path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .fold(output_dir.to_path_buf(), |acc, c| acc.join(c))
}

fn unpack_error(path: &Path, err: &std::io::Error) -> ExtractionError {
    ExtractionError::InvalidArchive(format!(
        "failed to unpack TAR entry {}: {err}",
        path.display()
    ))
}
