//! Configuration for bundle expansion and report building.

/// How tar entries are filtered while unpacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    /// Every entry is written verbatim relative to the extraction directory,
    /// including entries whose paths climb out of it with `..` and entries
    /// below a symlink extracted earlier from the same archive.
    ///
    /// Only use this for bundles from a trusted source.
    #[default]
    PassThrough,

    /// Entries whose path would escape the extraction directory are skipped
    /// and reported as warnings.
    Contained,
}

/// Configuration for recursive bundle expansion.
///
/// # Examples
///
/// ```
/// use tsbundle_core::ExpandConfig;
/// use tsbundle_core::config::EntryFilter;
///
/// let config = ExpandConfig::default();
/// assert_eq!(config.entry_filter, EntryFilter::PassThrough);
///
/// let strict = ExpandConfig {
///     max_depth: 4,
///     ..ExpandConfig::contained()
/// };
/// assert_eq!(strict.entry_filter, EntryFilter::Contained);
/// ```
#[derive(Debug, Clone)]
pub struct ExpandConfig {
    /// Maximum container nesting depth. The top-level bundle is depth 0.
    pub max_depth: usize,

    /// Filter applied to tar entries.
    pub entry_filter: EntryFilter,
}

impl Default for ExpandConfig {
    /// Default values:
    /// - `max_depth`: 16
    /// - `entry_filter`: [`EntryFilter::PassThrough`]
    fn default() -> Self {
        Self {
            max_depth: 16,
            entry_filter: EntryFilter::PassThrough,
        }
    }
}

impl ExpandConfig {
    /// Creates a configuration that refuses tar entries escaping the
    /// extraction directory.
    #[must_use]
    pub fn contained() -> Self {
        Self {
            entry_filter: EntryFilter::Contained,
            ..Default::default()
        }
    }
}

/// Configuration for locating record files and shaping the summary.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Maximum number of audit entries kept after sorting.
    pub audit_limit: usize,

    /// Audit `type` values that are dropped.
    pub excluded_audit_types: Vec<String>,

    /// Relative glob pattern for the version history file.
    pub version_pattern: String,

    /// Relative glob pattern for the audit history file.
    pub audit_pattern: String,

    /// Relative glob pattern for the site listing file.
    pub site_pattern: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            audit_limit: 20,
            excluded_audit_types: vec!["backup".to_string(), "backup-record".to_string()],
            version_pattern: "msc-db-json-*_temp/*_temp/backup/msc_versions.json".to_string(),
            audit_pattern: "msc-db-json-*_temp/*_temp/backup/msc_audit.json".to_string(),
            site_pattern: "msc-db-json-*_temp/*_temp/backup/msc_site2.json".to_string(),
        }
    }
}

impl ReportConfig {
    /// Returns `true` if audits of the given type are dropped.
    #[must_use]
    pub fn is_audit_type_excluded(&self, kind: &str) -> bool {
        self.excluded_audit_types.iter().any(|t| t == kind)
    }
}
