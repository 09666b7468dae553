//! Output formatter trait for CLI results.

use anyhow::Result;
use tsbundle_core::BundleSummary;
use tsbundle_core::ExpansionReport;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Report container failures and warnings from the expansion run
    fn format_expansion(&self, report: &ExpansionReport);

    /// Print the bundle summary
    fn format_summary(&self, summary: &BundleSummary) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}
