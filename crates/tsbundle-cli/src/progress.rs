//! Progress spinner for bundle expansion.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;
use tsbundle_core::ProgressCallback;

/// CLI spinner implementing `ProgressCallback`.
///
/// Shows the container being unpacked and a running count when stderr is a
/// TTY. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    containers: usize,
    files: usize,
}

impl CliProgress {
    /// Creates a new spinner.
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        // Template: "⠋ Unpacking node1.tar.gz [3 containers, 120 files] 4s"
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix} {msg} {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            containers: 0,
            files: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    fn counts(&self) -> String {
        format!("[{} containers, {} files]", self.containers, self.files)
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_container_start(&mut self, path: &Path, _depth: usize) {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.bar.set_message(format!("{name} {}", self.counts()));
    }

    fn on_container_complete(&mut self, _path: &Path, files: usize) {
        self.containers += 1;
        self.files += files;
        self.bar.tick();
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}
