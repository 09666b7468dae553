//! Expansion reporting and progress callbacks.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::ExtractionError;
use crate::formats::ContainerKind;

/// Report of unpacking a single container.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Number of files written.
    pub files_extracted: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Number of entries that were not written.
    pub entries_skipped: usize,

    /// Warnings generated while unpacking.
    pub warnings: Vec<String>,
}

impl UnpackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a skipped entry together with the reason.
    pub fn skip(&mut self, reason: String) {
        self.entries_skipped += 1;
        self.warnings.push(reason);
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A container that was unpacked to disk.
#[derive(Debug, Clone)]
pub struct UnpackedContainer {
    /// The container file.
    pub path: PathBuf,

    /// Format the content was read as.
    pub kind: ContainerKind,

    /// Directory holding the extracted members.
    pub extraction_dir: PathBuf,

    /// Per-container counters and warnings.
    pub report: UnpackReport,
}

/// A container that could not be unpacked.
#[derive(Debug)]
pub struct ContainerFailure {
    /// The container file.
    pub path: PathBuf,

    /// Why it failed.
    pub error: ExtractionError,
}

/// Report of a recursive expansion run.
#[derive(Debug, Default)]
pub struct ExpansionReport {
    /// Extraction directory of the top-level bundle, when known.
    pub root: Option<PathBuf>,

    /// Number of containers unpacked, the top-level one included.
    pub containers_unpacked: usize,

    /// Total files written across all containers.
    pub files_extracted: usize,

    /// Total directory entries created across all containers.
    pub directories_created: usize,

    /// Total entries not written across all containers.
    pub entries_skipped: usize,

    /// Deepest container nesting reached. The top-level bundle is depth 0.
    pub max_depth_reached: usize,

    /// Containers that failed; expansion continued past each of them.
    pub failures: Vec<ContainerFailure>,

    /// Warnings generated during expansion.
    pub warnings: Vec<String>,

    /// Duration of the expansion.
    pub duration: Duration,
}

impl ExpansionReport {
    /// Creates a new empty expansion report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a successfully unpacked container into the totals.
    pub fn record(&mut self, unpacked: &UnpackedContainer, depth: usize) {
        self.containers_unpacked += 1;
        self.files_extracted += unpacked.report.files_extracted;
        self.directories_created += unpacked.report.directories_created;
        self.entries_skipped += unpacked.report.entries_skipped;
        self.max_depth_reached = self.max_depth_reached.max(depth);
        self.warnings.extend(
            unpacked
                .report
                .warnings
                .iter()
                .map(|w| format!("{}: {w}", unpacked.path.display())),
        );
    }

    /// Records a container failure.
    pub fn fail(&mut self, path: PathBuf, error: ExtractionError) {
        self.failures.push(ContainerFailure { path, error });
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any container failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Callback trait for progress reporting during expansion.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tsbundle_core::ProgressCallback;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_container_start(&mut self, path: &Path, depth: usize) {
///         println!("{}unpacking {}", "  ".repeat(depth), path.display());
///     }
///
///     fn on_container_complete(&mut self, _path: &Path, files: usize) {
///         println!("  {files} files");
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback {
    /// Called before a container is unpacked.
    fn on_container_start(&mut self, path: &Path, depth: usize);

    /// Called after a container was unpacked successfully.
    fn on_container_complete(&mut self, path: &Path, files: usize);

    /// Called when the entire expansion is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_container_start(&mut self, _path: &Path, _depth: usize) {}

    fn on_container_complete(&mut self, _path: &Path, _files: usize) {}

    fn on_complete(&mut self) {}
}
