//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsbundle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the NDO tech-support bundle (.zip, .tar.gz or .tgz)
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,
}
