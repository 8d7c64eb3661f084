//! Convert command implementation.

use anyhow::{Context, Result};
use htconf_core::{Config, ConversionSummary, Converter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Command-line inputs for a conversion.
#[derive(Debug, Default)]
pub struct ConvertArgs {
    /// Start directory; falls back to the configured root, then `.`.
    pub dir: Option<PathBuf>,
    /// Extra exclude substrings.
    pub filters: Vec<String>,
    /// Extra directives to flag.
    pub directives: Vec<String>,
    /// Follow symbolic links (only overrides the config when set).
    pub follow_links: bool,
    /// Output file; stdout when absent.
    pub output: Option<PathBuf>,
}

/// Runs the conversion.
///
/// The output file is only created once at least one `.htaccess` file has
/// been found, so a failed run leaves nothing behind.
pub fn run(args: ConvertArgs, config: Config) -> Result<()> {
    let converter = build_converter(
        args.dir,
        args.filters,
        args.directives,
        args.follow_links,
        config,
    )?;

    tracing::debug!(
        "Converting {} with {} filters and {} rules",
        converter.root().display(),
        converter.filters().len(),
        converter.rule_count()
    );

    let files = converter.discover()?;

    let summary = match args.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let summary = render(&converter, &files, BufWriter::new(file))?;
            tracing::info!("Wrote {}", path.display());
            summary
        }
        None => render(&converter, &files, BufWriter::new(std::io::stdout().lock()))?,
    };

    if summary.has_warnings() {
        tracing::warn!(
            "{} line(s) need manual review before using this configuration",
            summary.warnings()
        );
    }

    Ok(())
}

fn build_converter(
    dir: Option<PathBuf>,
    filters: Vec<String>,
    directives: Vec<String>,
    follow_links: bool,
    config: Config,
) -> Result<Converter> {
    let mut builder = Converter::builder().config(config).excludes(filters);

    if let Some(dir) = dir {
        builder = builder.root(dir);
    }
    for directive in directives {
        builder = builder.directive(directive);
    }
    if follow_links {
        builder = builder.follow_links(true);
    }

    Ok(builder.build()?)
}

fn render<W: Write>(
    converter: &Converter,
    files: &[htconf_core::HtaccessFile],
    mut out: W,
) -> Result<ConversionSummary> {
    Ok(converter.render(files, &mut out)?)
}
