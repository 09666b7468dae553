//! Recursive expansion of nested containers.
//!
//! Every regular file under the tree whose name carries a container suffix
//! is unpacked next to itself and the resulting directory is expanded in
//! turn. Symlinks and other special files are left alone.
//!
//! Termination does not rely on the input being well-formed: containers and
//! directories are tracked by canonical path so nothing is processed twice in
//! one run, and container nesting is bounded by
//! [`ExpandConfig::max_depth`](crate::ExpandConfig::max_depth).
//!
//! An extraction directory is always walked right after its container is
//! unpacked, even if an earlier sibling (`node.tgz` next to `node.zip`)
//! already extracted into it.

use std::collections::HashSet;
use std::fs;
use std::fs::FileType;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use log::debug;
use log::warn;

use crate::ExpandConfig;
use crate::ExpansionReport;
use crate::ExtractionError;
use crate::ProgressCallback;
use crate::api::unpack;
use crate::formats::ContainerKind;

/// Expands every container found under `root`, in place.
///
/// Containers directly under `root` are at depth 1. Failures are recorded in
/// the returned report and never stop the walk.
///
/// # Examples
///
/// ```no_run
/// use tsbundle_core::ExpandConfig;
/// use tsbundle_core::NoopProgress;
/// use tsbundle_core::expand_tree;
///
/// let report = expand_tree("/tmp/ts-bundle", &ExpandConfig::default(), &mut NoopProgress);
/// for failure in &report.failures {
///     eprintln!("{}: {}", failure.path.display(), failure.error);
/// }
/// ```
pub fn expand_tree<P: AsRef<Path>>(
    root: P,
    config: &ExpandConfig,
    progress: &mut dyn ProgressCallback,
) -> ExpansionReport {
    let start = Instant::now();
    let mut expander = Expander::new(config, progress);
    expander.walk(root.as_ref(), 0);
    let mut report = expander.finish();
    report.duration = start.elapsed();
    report
}

pub(crate) struct Expander<'a> {
    config: &'a ExpandConfig,
    progress: &'a mut dyn ProgressCallback,
    visited: HashSet<PathBuf>,
    report: ExpansionReport,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(config: &'a ExpandConfig, progress: &'a mut dyn ProgressCallback) -> Self {
        Self {
            config,
            progress,
            visited: HashSet::new(),
            report: ExpansionReport::new(),
        }
    }

    pub(crate) fn report_mut(&mut self) -> &mut ExpansionReport {
        &mut self.report
    }

    /// Marks a path as processed. Returns `false` if it already was.
    pub(crate) fn mark_visited(&mut self, path: &Path) -> bool {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.visited.insert(key)
    }

    pub(crate) fn finish(self) -> ExpansionReport {
        self.progress.on_complete();
        self.report
    }

    /// Walks `dir`, whose own container nesting depth is `depth`.
    pub(crate) fn walk(&mut self, dir: &Path, depth: usize) {
        if self.mark_visited(dir) {
            self.walk_children(dir, depth);
        }
    }

    fn walk_children(&mut self, dir: &Path, depth: usize) {
        let children = match sorted_children(dir) {
            Ok(children) => children,
            Err(e) => {
                warn!("cannot list {}: {e}", dir.display());
                self.report
                    .add_warning(format!("cannot list {}: {e}", dir.display()));
                return;
            }
        };

        // Containers first, so an extraction directory left behind by an
        // earlier run is walked once, after it has been refreshed.
        for (path, file_type) in &children {
            if file_type.is_file() && ContainerKind::from_path(path).is_some() {
                self.expand_container(path, depth + 1);
            }
        }
        for (path, file_type) in &children {
            if file_type.is_dir() {
                self.walk(path, depth);
            }
        }
    }

    fn expand_container(&mut self, path: &Path, depth: usize) {
        if depth > self.config.max_depth {
            warn!(
                "not unpacking {}: nesting depth {depth} exceeds {}",
                path.display(),
                self.config.max_depth
            );
            self.report.fail(
                path.to_path_buf(),
                ExtractionError::NestingTooDeep {
                    path: path.to_path_buf(),
                    max_depth: self.config.max_depth,
                },
            );
            return;
        }

        if !self.mark_visited(path) {
            self.report.fail(
                path.to_path_buf(),
                ExtractionError::AlreadyExpanded {
                    path: path.to_path_buf(),
                },
            );
            return;
        }

        self.progress.on_container_start(path, depth);
        match unpack(path, self.config) {
            Ok(unpacked) => {
                self.progress
                    .on_container_complete(path, unpacked.report.files_extracted);
                self.report.record(&unpacked, depth);
                let dir = &unpacked.extraction_dir;
                if !self.mark_visited(dir) {
                    let message = format!(
                        "{} shares extraction directory {} with another container",
                        path.display(),
                        dir.display()
                    );
                    warn!("{message}");
                    self.report.add_warning(message);
                }
                self.walk_children(dir, depth);
            }
            Err(error) => {
                warn!("failed to unpack {}: {error}", path.display());
                self.report.fail(path.to_path_buf(), error);
            }
        }
    }
}

/// Lists the children of `dir` sorted by file name. File types are taken
/// from the directory entry, so symlinks are reported as symlinks.
fn sorted_children(dir: &Path) -> std::io::Result<Vec<(PathBuf, FileType)>> {
    let mut children = fs::read_dir(dir)?
        .map(|entry| {
            let entry = entry?;
            Ok((entry.path(), entry.file_type()?))
        })
        .collect::<std::io::Result<Vec<_>>>()?;
    children.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    debug!("{}: {} entries", dir.display(), children.len());
    Ok(children)
}
