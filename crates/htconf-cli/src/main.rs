//! htaccess2conf CLI tool.
//!
//! Usage:
//! ```bash
//! htaccess2conf [OPTIONS] [FILTERS]... > htaccess.conf
//! htaccess2conf -d public evilDirectory > htaccess.conf
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config_resolver;
mod convert;

/// Convert every .htaccess file under a directory into httpd.conf <Directory> blocks
#[derive(Parser)]
#[command(name = "htaccess2conf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Extra path substrings to exclude, on top of .svn, .cvs and .git
    filters: Vec<String>,

    /// Directory to start from (default: current directory)
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the configuration to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional directive to flag for manual review (can be specified multiple times)
    #[arg(long = "directive")]
    directives: Vec<String>,

    /// Follow symbolic links while walking
    #[arg(long)]
    follow_links: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the generated config, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let resolved = config_resolver::resolve(cli.dir.as_deref(), cli.config.as_deref())?;
    tracing::debug!("Config source: {:?}", resolved.source);

    convert::run(
        convert::ConvertArgs {
            dir: cli.dir,
            filters: cli.filters,
            directives: cli.directives,
            follow_links: cli.follow_links,
            output: cli.output,
        },
        resolved.config,
    )
}
