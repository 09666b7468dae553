//! Report command implementation.

use crate::cli::Cli;
use crate::error::add_bundle_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use log::info;
use tsbundle_core::ExpandConfig;
use tsbundle_core::NoopProgress;
use tsbundle_core::ReportConfig;
use tsbundle_core::expand_bundle;
use tsbundle_core::summarize;

pub fn execute(args: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = ExpandConfig::default();

    // Use a spinner if stderr is a terminal
    let report = if CliProgress::should_show() {
        let mut progress = CliProgress::new("Unpacking");
        add_bundle_context(
            expand_bundle(&args.bundle, &config, &mut progress),
            &args.bundle,
        )?
    } else {
        let mut noop = NoopProgress;
        add_bundle_context(
            expand_bundle(&args.bundle, &config, &mut noop),
            &args.bundle,
        )?
    };

    info!(
        "expanded {} containers ({} files) in {:?}",
        report.containers_unpacked, report.files_extracted, report.duration
    );
    formatter.format_expansion(&report);

    let root = report
        .root
        .as_deref()
        .context("bundle expansion did not report an extraction directory")?;
    let summary = summarize(root, &ReportConfig::default());
    formatter.format_summary(&summary)?;

    Ok(())
}
