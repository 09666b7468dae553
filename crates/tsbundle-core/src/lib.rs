//! Expansion and record recovery for NDO tech-support bundles.
//!
//! `tsbundle-core` unpacks a tech-support bundle and every zip or gzip-tar
//! container nested inside it, then recovers the database dumps it holds.
//! Those dumps are concatenated JSON objects with no enclosing array; the
//! [`recover`] module splits them into objects and decodes each one on its
//! own so that a damaged record never hides its neighbours.
//!
//! # Examples
//!
//! ```no_run
//! use tsbundle_core::ExpandConfig;
//! use tsbundle_core::NoopProgress;
//! use tsbundle_core::ReportConfig;
//! use tsbundle_core::expand_bundle;
//! use tsbundle_core::summary::summarize;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = expand_bundle("ts-bundle.zip", &ExpandConfig::default(), &mut NoopProgress)?;
//! let root = report.root.as_deref().ok_or("bundle has no extraction root")?;
//!
//! let summary = summarize(root, &ReportConfig::default());
//! for version in summary.versions.records() {
//!     println!("{} ({})", version.version, version.timestamp);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod expand;
pub mod formats;
pub mod records;
pub mod recover;
pub mod report;
pub mod summary;
pub mod timestamp;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::expand_bundle;
pub use api::unpack;
pub use config::EntryFilter;
pub use config::ExpandConfig;
pub use config::ReportConfig;
pub use error::ExtractionError;
pub use error::ParseError;
pub use error::RecordError;
pub use error::Result;
pub use expand::expand_tree;
pub use formats::ContainerKind;
pub use recover::Recovery;
pub use report::ContainerFailure;
pub use report::ExpansionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::UnpackReport;
pub use report::UnpackedContainer;
pub use summary::BundleSummary;
pub use summary::Section;
pub use summary::summarize;
