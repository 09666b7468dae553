//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Alignment;
use console::Term;
use console::measure_text_width;
use console::pad_str;
use console::style;
use tsbundle_core::BundleSummary;
use tsbundle_core::ExpansionReport;
use tsbundle_core::Section;
use tsbundle_core::records::AuditRecord;
use tsbundle_core::records::SiteRecord;
use tsbundle_core::records::VersionRecord;

const SITE_HEADERS: [&str; 4] = ["Site ID", "Name", "Site Version", "Site OID"];

pub struct HumanFormatter {
    use_colors: bool,
    term: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.term.write_line(line)?;
        }
        Ok(())
    }

    fn report_unavailable<T>(&self, section: &Section<T>) {
        if let Section::Unavailable(err) = section {
            self.format_warning(&err.to_string());
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_expansion(&self, report: &ExpansionReport) {
        for failure in &report.failures {
            self.format_warning(&format!(
                "could not unpack {}: {}",
                failure.path.display(),
                failure.error
            ));
        }
        for warning in &report.warnings {
            self.format_warning(warning);
        }
    }

    fn format_summary(&self, summary: &BundleSummary) -> Result<()> {
        let banner = format!("NDO Basic Output v{}", env!("CARGO_PKG_VERSION"));
        if self.use_colors {
            self.term.write_line(&style(banner).bold().to_string())?;
        } else {
            self.term.write_line(&banner)?;
        }
        self.term.write_line("")?;

        self.report_unavailable(&summary.versions);
        self.write_lines(&version_lines(summary.versions.records()))?;
        self.term.write_line("")?;

        self.report_unavailable(&summary.sites);
        self.write_lines(&site_table(summary.sites.records()))?;
        self.term.write_line("")?;

        self.report_unavailable(&summary.audits);
        self.write_lines(&audit_lines(summary.audits.records(), summary.audit_limit))?;

        for warning in &summary.warnings {
            self.format_warning(warning);
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if console::colors_enabled_stderr() {
            let _ = self
                .err
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(&format!("WARNING: {message}"));
        }
    }
}

fn version_lines(versions: &[VersionRecord]) -> Vec<String> {
    if versions.is_empty() {
        return vec!["No NDO version information found.".to_string()];
    }

    std::iter::once("NDO versions found:".to_string())
        .chain(
            versions
                .iter()
                .map(|v| format!(" - Version: {}, Date: {}", v.version, v.timestamp)),
        )
        .collect()
}

fn site_table(sites: &[SiteRecord]) -> Vec<String> {
    if sites.is_empty() {
        return vec!["No site information found.".to_string()];
    }

    let rows: Vec<[&str; 4]> = sites
        .iter()
        .map(|s| {
            [
                s.site_id.as_str(),
                s.name.as_str(),
                s.site_version.as_str(),
                s.oid.as_str(),
            ]
        })
        .collect();

    let widths: Vec<usize> = (0..SITE_HEADERS.len())
        .map(|col| {
            rows.iter()
                .map(|row| measure_text_width(row[col]))
                .fold(measure_text_width(SITE_HEADERS[col]), usize::max)
        })
        .collect();

    let render = |cells: &[&str; 4]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad_str(cell, width, Alignment::Left, None).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(&SITE_HEADERS));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join(" "),
    );
    lines.extend(rows.iter().map(render));
    lines
}

fn audit_lines(audits: &[AuditRecord], limit: usize) -> Vec<String> {
    if audits.is_empty() {
        return vec!["No relevant audit entries found.".to_string()];
    }

    let heading = format!("Last {limit} audits (ignoring backup):");
    let rule = "-".repeat(heading.len());
    [heading, rule]
        .into_iter()
        .chain(
            audits
                .iter()
                .map(|a| format!("{} - {}", a.timestamp, a.description)),
        )
        .collect()
}
