use std::path::PathBuf;

use clap::Parser;

use crate::config::{get_config_dir, get_data_dir};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Directory holding the images to sort. Defaults to the current directory
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

pub fn version() -> String {
    let author = clap::crate_authors!();

    format!(
        "\
{}

Authors: {author}

Config directory: {}
Data directory: {}",
        env!("CARGO_PKG_VERSION"),
        get_config_dir().display(),
        get_data_dir().display()
    )
}
