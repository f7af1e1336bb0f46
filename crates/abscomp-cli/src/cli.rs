use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Audiobookshelf Library Comparison Tool
///
/// Compare the books of two Audiobookshelf libraries and report what was added, removed, or changed
#[derive(Parser, Debug)]
#[command(name = "abscomp")]
#[command(long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use specific config file
    #[arg(short, long, global = true, value_name = "PATH", env = "ABSCOMP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch both libraries and compare them
    Compare {
        /// Write the added/removed and changed-field CSV files
        #[arg(long)]
        csv: bool,

        /// Write the JSON report
        #[arg(long)]
        json: bool,

        /// Also write the full contents of both libraries and the items
        /// found in both
        #[arg(long)]
        dump_libraries: bool,

        /// Directory for written files
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Maximum items listed per section (0 prints counts only)
        #[arg(short, long, value_name = "N", default_value_t = 10)]
        list: usize,

        /// Disable coloured output
        #[arg(long)]
        no_color: bool,
    },

    /// Show the resolved configuration with tokens redacted
    Config,
}
