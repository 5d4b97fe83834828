use clap::Parser;
use std::path::PathBuf;

use crate::nav::Page;

/// Command-line arguments for edudash
#[derive(Parser, Debug)]
#[command(version, about = "edudash")]
pub struct Args {
    /// Observations file (delimited text). Falls back to the [data] section
    /// of the config file.
    pub observations: Option<PathBuf>,

    /// Indicator metadata file (delimited text). Falls back to the config file.
    pub metadata: Option<PathBuf>,

    /// Specify the delimiter to use when reading the data files
    #[arg(long = "delimiter")]
    pub delimiter: Option<u8>,

    /// Start on this page instead of home (e.g. "cross", "Nepal")
    #[arg(long = "page", value_parser = Page::from_name)]
    pub page: Option<Page>,

    /// Enable debug mode to show operational information
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Write the default config file and exit
    #[arg(long = "write-default-config", action)]
    pub write_default_config: bool,
}
