//! ZIP container handler.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use crate::ExpandConfig;
use crate::ExtractionError;
use crate::Result;
use crate::UnpackReport;

use super::traits::ContainerFormat;

/// ZIP container handler.
pub struct ZipContainer<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
}

impl ZipContainer<BufReader<File>> {
    /// Opens a ZIP container on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its central
    /// directory cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipContainer<R> {
    /// Wraps a seekable reader holding a ZIP archive.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArchive` if the central directory is unreadable.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)
            .map_err(|e| ExtractionError::InvalidArchive(format!("failed to open ZIP: {e}")))?;
        Ok(Self { archive })
    }

    /// Returns the number of members in the archive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> ContainerFormat for ZipContainer<R> {
    fn unpack(&mut self, output_dir: &Path, _config: &ExpandConfig) -> Result<UnpackReport> {
        let mut report = UnpackReport::new();

        for index in 0..self.archive.len() {
            let mut member = self.archive.by_index(index).map_err(|e| {
                ExtractionError::InvalidArchive(format!("failed to read ZIP entry {index}: {e}"))
            })?;

            // Names with `..` or a root are never written outside output_dir
            let Some(relative) = member.enclosed_name() else {
                report.skip(format!("unsafe ZIP entry name: {}", member.name()));
                continue;
            };
            let target = output_dir.join(relative);

            if member.is_dir() {
                fs::create_dir_all(&target)?;
                report.directories_created += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut member, &mut out).map_err(|e| {
                ExtractionError::InvalidArchive(format!(
                    "failed to extract ZIP entry {}: {e}",
                    member.name()
                ))
            })?;
            report.files_extracted += 1;
        }

        Ok(report)
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}
