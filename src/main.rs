//! svginline - inline SVG placeholders in a built site.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use svginline::cli::{Cli, rewrite};
use svginline::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    rewrite::run(&cli)
}
