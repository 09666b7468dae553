//! Typed records projected from recovered JSON values.
//!
//! Projection never fails. Values that are not objects are skipped and
//! fields that are absent or `null` fall back to fixed placeholders, so a
//! partially populated dump still produces a row per record.

use serde_json::Value;

use crate::config::ReportConfig;

/// Placeholder for a missing version string.
pub const UNKNOWN_VERSION: &str = "Unknown Version";
/// Placeholder for a missing timestamp.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown Timestamp";
/// Placeholder for a missing audit description.
pub const NO_DESCRIPTION: &str = "No Description";
/// Placeholder for a missing site identifier.
pub const UNKNOWN_SITE_ID: &str = "Unknown Site ID";
/// Placeholder for a missing site name.
pub const UNKNOWN_NAME: &str = "Unknown Name";
/// Placeholder for a missing site object id.
pub const UNKNOWN_SITE_OID: &str = "Unknown Site OID";

/// One entry of the product version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Installed version.
    pub version: String,
    /// When the version was recorded.
    pub timestamp: String,
}

impl VersionRecord {
    /// Projects `version` and `timestamp` from an object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;
        Some(Self {
            version: field(value, "/version", UNKNOWN_VERSION),
            timestamp: field(value, "/timestamp", UNKNOWN_TIMESTAMP),
        })
    }
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// The audit `type`, if present.
    pub kind: Option<String>,
    /// When the event happened.
    pub timestamp: String,
    /// Human readable description.
    pub description: String,
}

impl AuditRecord {
    /// Projects `type`, `timestamp` and `description` from an object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;
        Some(Self {
            kind: optional_field(value, "/type"),
            timestamp: field(value, "/timestamp", UNKNOWN_TIMESTAMP),
            description: field(value, "/description", NO_DESCRIPTION),
        })
    }
}

/// One row of the site table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRecord {
    /// `common.siteid`.
    pub site_id: String,
    /// `common.name`.
    pub name: String,
    /// `common.siteversion`.
    pub site_version: String,
    /// `_id.$oid`.
    pub oid: String,
}

impl SiteRecord {
    /// Projects the nested site fields from an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use tsbundle_core::records::SiteRecord;
    /// use tsbundle_core::records::UNKNOWN_SITE_ID;
    ///
    /// let site = SiteRecord::from_value(&json!({
    ///     "common": {"name": "dc1", "siteversion": "5.2(1)"},
    ///     "_id": {"$oid": "65a0c1"}
    /// }))
    /// .unwrap();
    /// assert_eq!(site.site_id, UNKNOWN_SITE_ID);
    /// assert_eq!(site.name, "dc1");
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?;
        Some(Self {
            site_id: field(value, "/common/siteid", UNKNOWN_SITE_ID),
            name: field(value, "/common/name", UNKNOWN_NAME),
            site_version: field(value, "/common/siteversion", UNKNOWN_VERSION),
            oid: field(value, "/_id/$oid", UNKNOWN_SITE_OID),
        })
    }
}

/// Projects every object in `values` into a version record.
#[must_use]
pub fn project_versions(values: &[Value]) -> Vec<VersionRecord> {
    values.iter().filter_map(VersionRecord::from_value).collect()
}

/// Projects every object in `values` into an audit record, dropping the
/// types excluded by `config`.
#[must_use]
pub fn project_audits(values: &[Value], config: &ReportConfig) -> Vec<AuditRecord> {
    values
        .iter()
        .filter_map(AuditRecord::from_value)
        .filter(|audit| {
            audit
                .kind
                .as_deref()
                .is_none_or(|kind| !config.is_audit_type_excluded(kind))
        })
        .collect()
}

/// Projects every object in `values` into a site record.
#[must_use]
pub fn project_sites(values: &[Value]) -> Vec<SiteRecord> {
    values.iter().filter_map(SiteRecord::from_value).collect()
}

fn optional_field(value: &Value, pointer: &str) -> Option<String> {
    match value.pointer(pointer)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn field(value: &Value, pointer: &str, placeholder: &str) -> String {
    optional_field(value, pointer).unwrap_or_else(|| placeholder.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_fields() {
        let record =
            VersionRecord::from_value(&json!({"version": "4.2(3e)", "timestamp": "2024-01-01"}))
                .unwrap();
        assert_eq!(record.version, "4.2(3e)");
        assert_eq!(record.timestamp, "2024-01-01");
    }

    #[test]
    fn test_version_placeholders() {
        let record = VersionRecord::from_value(&json!({"other": 1})).unwrap();
        assert_eq!(record.version, UNKNOWN_VERSION);
        assert_eq!(record.timestamp, UNKNOWN_TIMESTAMP);
    }

    #[test]
    fn test_null_uses_placeholder() {
        let record = VersionRecord::from_value(&json!({"version": null})).unwrap();
        assert_eq!(record.version, UNKNOWN_VERSION);
    }

    #[test]
    fn test_non_string_scalar_rendered_as_json() {
        let record = VersionRecord::from_value(&json!({"version": 4.1, "timestamp": 17})).unwrap();
        assert_eq!(record.version, "4.1");
        assert_eq!(record.timestamp, "17");
    }

    #[test]
    fn test_non_objects_skipped() {
        let values = vec![json!([1, 2]), json!("text"), json!({"version": "1.0"}), json!(3)];
        let versions = project_versions(&values);
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, "1.0");
    }

    #[test]
    fn test_site_fields() {
        let site = SiteRecord::from_value(&json!({
            "common": {"siteid": "1", "name": "dc1", "siteversion": "5.2(1)"},
            "_id": {"$oid": "65a0c1"}
        }))
        .unwrap();
        assert_eq!(
            site,
            SiteRecord {
                site_id: "1".to_string(),
                name: "dc1".to_string(),
                site_version: "5.2(1)".to_string(),
                oid: "65a0c1".to_string(),
            }
        );
    }

    #[test]
    fn test_site_without_common() {
        let site = SiteRecord::from_value(&json!({"_id": "flat"})).unwrap();
        assert_eq!(site.site_id, UNKNOWN_SITE_ID);
        assert_eq!(site.name, UNKNOWN_NAME);
        assert_eq!(site.site_version, UNKNOWN_VERSION);
        assert_eq!(site.oid, UNKNOWN_SITE_OID);
    }

    #[test]
    fn test_audit_exclusion() {
        let values = vec![
            json!({"type": "backup", "timestamp": "t1", "description": "nightly"}),
            json!({"type": "backup-record", "timestamp": "t2"}),
            json!({"type": "site-update", "timestamp": "t3", "description": "added dc2"}),
            json!({"timestamp": "t4"}),
        ];
        let audits = project_audits(&values, &ReportConfig::default());

        assert_eq!(audits.len(), 2);
        assert_eq!(audits[0].kind.as_deref(), Some("site-update"));
        assert_eq!(audits[0].description, "added dc2");
        assert_eq!(audits[1].kind, None);
        assert_eq!(audits[1].description, NO_DESCRIPTION);
    }

    #[test]
    fn test_audit_exclusion_is_configurable() {
        let config = ReportConfig {
            excluded_audit_types: vec!["login".to_string()],
            ..Default::default()
        };
        let values = vec![json!({"type": "backup"}), json!({"type": "login"})];
        let audits = project_audits(&values, &config);
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].kind.as_deref(), Some("backup"));
    }
}
