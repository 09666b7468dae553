//! Record discovery and projection.

pub mod discover;
pub mod project;

pub use discover::Located;
pub use discover::RecordPattern;
pub use discover::locate;
pub use project::AuditRecord;
pub use project::NO_DESCRIPTION;
pub use project::SiteRecord;
pub use project::UNKNOWN_NAME;
pub use project::UNKNOWN_SITE_ID;
pub use project::UNKNOWN_SITE_OID;
pub use project::UNKNOWN_TIMESTAMP;
pub use project::UNKNOWN_VERSION;
pub use project::VersionRecord;
pub use project::project_audits;
pub use project::project_sites;
pub use project::project_versions;
