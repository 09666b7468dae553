//! Building the bundle summary from an expanded tree.
//!
//! Each of the three record files is located, recovered and projected
//! independently: a missing or damaged file empties its own section and
//! leaves the others intact.

use std::path::Path;
use std::path::PathBuf;

use log::warn;
use serde_json::Value;

use crate::config::ReportConfig;
use crate::error::RecordError;
use crate::records::AuditRecord;
use crate::records::RecordPattern;
use crate::records::SiteRecord;
use crate::records::VersionRecord;
use crate::records::locate;
use crate::records::project_audits;
use crate::records::project_sites;
use crate::records::project_versions;
use crate::recover::recover_file;
use crate::timestamp::sort_newest_first;

/// One section of the summary.
#[derive(Debug)]
pub enum Section<T> {
    /// The record file was found and read.
    Found {
        /// The file the records came from.
        path: PathBuf,
        /// Projected records, already sorted and filtered.
        records: Vec<T>,
    },

    /// The record file was missing or unreadable.
    Unavailable(RecordError),
}

impl<T> Section<T> {
    /// Returns the records, or an empty slice if the section is unavailable.
    #[must_use]
    pub fn records(&self) -> &[T] {
        match self {
            Self::Found { records, .. } => records,
            Self::Unavailable(_) => &[],
        }
    }

    /// Returns the source file, if it was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found { path, .. } => Some(path),
            Self::Unavailable(_) => None,
        }
    }

    /// Returns `true` if the section has no records, whatever the reason.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// Everything the report prints about a bundle.
#[derive(Debug)]
pub struct BundleSummary {
    /// Version history, newest first.
    pub versions: Section<VersionRecord>,

    /// Sites, ordered by site id.
    pub sites: Section<SiteRecord>,

    /// Most recent non-excluded audits, newest first.
    pub audits: Section<AuditRecord>,

    /// The limit `audits` was truncated to.
    pub audit_limit: usize,

    /// Non-fatal problems found while building the summary.
    pub warnings: Vec<String>,
}

/// Locates, recovers and projects the record files under `root`.
///
/// Never fails: problems are reported per section or as warnings.
///
/// # Examples
///
/// ```no_run
/// use tsbundle_core::ReportConfig;
/// use tsbundle_core::summary::summarize;
///
/// let summary = summarize("/tmp/ts-bundle", &ReportConfig::default());
/// for version in summary.versions.records() {
///     println!("{} {}", version.version, version.timestamp);
/// }
/// ```
pub fn summarize<P: AsRef<Path>>(root: P, config: &ReportConfig) -> BundleSummary {
    let root = root.as_ref();
    let mut warnings = Vec::new();

    let versions = load_section(root, &config.version_pattern, &mut warnings, |values| {
        project_versions(values)
    });
    let versions = sort_section(versions, &mut warnings, |v: &VersionRecord| {
        v.timestamp.as_str()
    });

    let audits = load_section(root, &config.audit_pattern, &mut warnings, |values| {
        project_audits(values, config)
    });
    let mut audits = sort_section(audits, &mut warnings, |a: &AuditRecord| {
        a.timestamp.as_str()
    });
    if let Section::Found { records, .. } = &mut audits {
        records.truncate(config.audit_limit);
    }

    let mut sites = load_section(root, &config.site_pattern, &mut warnings, |values| {
        project_sites(values)
    });
    if let Section::Found { records, .. } = &mut sites {
        records.sort_by(|a, b| a.site_id.cmp(&b.site_id));
    }

    BundleSummary {
        versions,
        sites,
        audits,
        audit_limit: config.audit_limit,
        warnings,
    }
}

fn load_section<T, F>(
    root: &Path,
    pattern: &str,
    warnings: &mut Vec<String>,
    project: F,
) -> Section<T>
where
    F: FnOnce(&[Value]) -> Vec<T>,
{
    let located = match RecordPattern::new(pattern).and_then(|p| locate(root, &p)) {
        Ok(located) => located,
        Err(e) => return Section::Unavailable(e),
    };

    for extra in &located.ignored {
        warn!("ignoring additional match {}", extra.display());
        warnings.push(format!(
            "{} also matches {pattern}; using {}",
            extra.display(),
            located.path.display()
        ));
    }

    let recovery = recover_file(&located.path);
    if let Some(source) = recovery.read_error {
        return Section::Unavailable(RecordError::Unreadable {
            path: located.path,
            source,
        });
    }
    warnings.extend(
        recovery
            .skipped
            .iter()
            .map(|e| format!("{}: {e}", located.path.display())),
    );

    Section::Found {
        records: project(&recovery.objects),
        path: located.path,
    }
}

fn sort_section<T, F>(section: Section<T>, warnings: &mut Vec<String>, key: F) -> Section<T>
where
    F: Fn(&T) -> &str,
{
    match section {
        Section::Found { path, mut records } => {
            for bad in sort_newest_first(&mut records, key) {
                warn!("{}: unparseable timestamp {bad:?}", path.display());
                warnings.push(format!("{}: unparseable timestamp {bad:?}", path.display()));
            }
            Section::Found { path, records }
        }
        unavailable @ Section::Unavailable(_) => unavailable,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BACKUP: &str = "msc-db-json-20240101_temp/msc-db-json-20240101_temp/backup";

    fn write_record(root: &Path, name: &str, content: &str) {
        let dir = root.join(BACKUP);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_versions_newest_first() {
        let temp = TempDir::new().unwrap();
        write_record(
            temp.path(),
            "msc_versions.json",
            r#"{"version":"1.0","timestamp":"2024-01-01T00:00:00"}
{"version":"1.1","timestamp":"2024-02-01T00:00:00"}"#,
        );

        let summary = summarize(temp.path(), &ReportConfig::default());
        let versions = summary.versions.records();

        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].version, "1.1");
        assert_eq!(versions[1].version, "1.0");
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_missing_sections_are_independent() {
        let temp = TempDir::new().unwrap();
        write_record(
            temp.path(),
            "msc_site2.json",
            r#"{"common":{"siteid":"2","name":"b"}}{"common":{"siteid":"1","name":"a"}}"#,
        );

        let summary = summarize(temp.path(), &ReportConfig::default());

        assert!(matches!(
            summary.versions,
            Section::Unavailable(RecordError::MissingFile { .. })
        ));
        assert!(summary.audits.is_empty());
        let sites = summary.sites.records();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].site_id, "1");
        assert_eq!(sites[1].name, "b");
        assert!(summary.sites.path().unwrap().ends_with("msc_site2.json"));
    }

    #[test]
    fn test_invalid_pattern_only_affects_its_section() {
        let temp = TempDir::new().unwrap();
        write_record(
            temp.path(),
            "msc_versions.json",
            r#"{"version":"4.2","timestamp":"2024-01-01"}"#,
        );
        let config = ReportConfig {
            audit_pattern: "backup/[audit".to_string(),
            ..ReportConfig::default()
        };

        let summary = summarize(temp.path(), &config);

        assert!(matches!(
            summary.audits,
            Section::Unavailable(RecordError::InvalidPattern { .. })
        ));
        assert_eq!(summary.versions.records().len(), 1);
    }

    #[test]
    fn test_audits_filtered_sorted_truncated() {
        let temp = TempDir::new().unwrap();
        let mut dump = String::new();
        for day in 1..=25 {
            dump.push_str(&format!(
                r#"{{"type":"login","timestamp":"2024-01-{day:02}T00:00:00","description":"day {day}"}}"#
            ));
            dump.push_str(&format!(
                r#"{{"type":"backup","timestamp":"2024-02-{day:02}T00:00:00"}}"#
            ));
        }
        write_record(temp.path(), "msc_audit.json", &dump);

        let summary = summarize(temp.path(), &ReportConfig::default());
        let audits = summary.audits.records();

        assert_eq!(audits.len(), 20);
        assert_eq!(audits[0].description, "day 25");
        assert_eq!(audits[19].description, "day 6");
        assert!(audits.iter().all(|a| a.kind.as_deref() == Some("login")));
    }

    #[test]
    fn test_unparseable_timestamp_warns() {
        let temp = TempDir::new().unwrap();
        write_record(
            temp.path(),
            "msc_versions.json",
            r#"{"version":"x"}{"version":"1.0","timestamp":"2024-01-01"}"#,
        );

        let summary = summarize(temp.path(), &ReportConfig::default());
        let versions = summary.versions.records();

        assert_eq!(versions[0].version, "1.0");
        assert_eq!(versions[1].version, "x");
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].contains("Unknown Timestamp"));
    }

    #[test]
    fn test_damaged_objects_warn() {
        let temp = TempDir::new().unwrap();
        write_record(
            temp.path(),
            "msc_versions.json",
            r#"{"version":"1.0","timestamp":"2024-01-01"}{"version":}"#,
        );

        let summary = summarize(temp.path(), &ReportConfig::default());

        assert_eq!(summary.versions.records().len(), 1);
        assert_eq!(summary.warnings.len(), 1);
    }

    #[test]
    fn test_multiple_matches_use_first() {
        let temp = TempDir::new().unwrap();
        write_record(temp.path(), "msc_versions.json", r#"{"version":"a"}"#);
        let later = temp
            .path()
            .join("msc-db-json-20250101_temp/msc-db-json-20250101_temp/backup");
        fs::create_dir_all(&later).unwrap();
        fs::write(later.join("msc_versions.json"), r#"{"version":"b"}"#).unwrap();

        let summary = summarize(temp.path(), &ReportConfig::default());

        assert_eq!(summary.versions.records()[0].version, "a");
        assert!(summary.warnings.iter().any(|w| w.contains("also matches")));
    }
}
