//! Locating record files under an expanded bundle.

use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use globset::GlobMatcher;
use log::debug;
use walkdir::WalkDir;

use crate::error::RecordError;

/// A relative glob pattern such as
/// `msc-db-json-*_temp/*_temp/backup/msc_versions.json`.
///
/// Wildcards never cross a `/`, so a match always has exactly as many path
/// components as the pattern has segments.
#[derive(Debug, Clone)]
pub struct RecordPattern {
    raw: String,
    depth: usize,
    matcher: GlobMatcher,
}

impl RecordPattern {
    /// Parses a pattern. Empty segments (leading, trailing or doubled `/`)
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidPattern` if the pattern is not a valid
    /// glob.
    pub fn new(pattern: &str) -> Result<Self, RecordError> {
        let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let matcher = GlobBuilder::new(&segments.join("/"))
            .literal_separator(true)
            .build()
            .map_err(|source| RecordError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        Ok(Self {
            raw: pattern.to_string(),
            depth: segments.len(),
            matcher,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of path components a match has.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Matches a path relative to the search root.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tsbundle_core::records::RecordPattern;
    ///
    /// let pattern =
    ///     RecordPattern::new("msc-db-json-*_temp/*_temp/backup/msc_audit.json").unwrap();
    /// assert!(pattern.matches(Path::new(
    ///     "msc-db-json-20240101_temp/msc-db-json-20240101_temp/backup/msc_audit.json"
    /// )));
    /// assert!(!pattern.matches(Path::new("other/x_temp/backup/msc_audit.json")));
    /// ```
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        self.matcher.is_match(relative)
    }
}

/// Result of resolving a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// The file that will be read: the lexicographically first match.
    pub path: PathBuf,

    /// Further matches, in order, that are not read.
    pub ignored: Vec<PathBuf>,
}

/// Returns every regular file under `root` matching `pattern`, sorted by
/// path.
#[must_use]
pub fn find_all(root: &Path, pattern: &RecordPattern) -> Vec<PathBuf> {
    if pattern.depth() == 0 {
        return Vec::new();
    }

    let mut matches: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(pattern.depth())
        .max_depth(pattern.depth())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("skipping unreadable entry under {}: {e}", root.display());
                None
            }
        })
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .is_ok_and(|relative| pattern.matches(relative))
        })
        .map(walkdir::DirEntry::into_path)
        .collect();

    matches.sort();
    matches
}

/// Resolves `pattern` under `root` to a single file.
///
/// When several files match, the lexicographically first one is chosen and
/// the others are listed in [`Located::ignored`].
///
/// # Errors
///
/// Returns `RecordError::MissingFile` if nothing matches.
pub fn locate(root: &Path, pattern: &RecordPattern) -> Result<Located, RecordError> {
    let mut matches = find_all(root, pattern).into_iter();
    let path = matches.next().ok_or_else(|| RecordError::MissingFile {
        pattern: pattern.as_str().to_string(),
    })?;
    Ok(Located {
        path,
        ignored: matches.collect(),
    })
}
