use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use jmerge::config::CONFIG_FILE_NAME;
use jmerge::{MergeConfig, MergeSummary, WriteOptions};

mod format;
mod telemetry;

use format::OutputFormat;

/// Merge JUnit XML reports into one
///
/// Test suites with the same name are merged: their counters are combined
/// (`time` takes the maximum, the others are summed) and their test cases
/// concatenated. The root <testsuites> totals are recomputed from the merged
/// suites.
///
/// EXAMPLES:
///
///   # Combine a.xml and b.xml into target.xml
///   jmerge target.xml a.xml b.xml
///
///   # Glob patterns select input files (quote them)
///   jmerge ./results/combined.xml "./results/units/*.xml" "./results/e2e/*.xml"
#[derive(Parser)]
#[command(name = "jmerge")]
#[command(version, about)]
struct Cli {
    /// File to write the merged report to (parent directories are created)
    destination: PathBuf,

    /// Input report paths or glob patterns, merged in the order given
    #[arg(required = true)]
    sources: Vec<String>,

    /// Configuration file
    #[arg(long, env = "JMERGE_CONFIG", default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Spaces per nesting level; 0 writes the report on a single line
    #[arg(long)]
    indent: Option<usize>,

    /// Omit the <?xml ...?> declaration line
    #[arg(long)]
    no_declaration: bool,

    /// Output format for the run summary: text or json
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let options = write_options(cli, &config);

    let files = jmerge::discover::resolve_sources(&cli.sources)
        .context("Failed to resolve input patterns")?;
    if config.input.require_matches && files.is_empty() {
        bail!("Provided input file patterns did not match any file.");
    }

    let summary = jmerge::merge_paths(&cli.destination, files, &options, |path| {
        tracing::info!(path = %path.display(), "processed");
    })
    .with_context(|| format!("Failed to merge into {}", cli.destination.display()))?;

    report(&summary, cli.format)
}

fn load_config(path: &Path) -> Result<MergeConfig> {
    let explicit = path != Path::new(CONFIG_FILE_NAME);
    if explicit && !path.exists() {
        bail!("Config file not found: {}", path.display());
    }
    MergeConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn write_options(cli: &Cli, config: &MergeConfig) -> WriteOptions {
    let mut options = config.write_options();
    if let Some(indent) = cli.indent {
        options.indent = indent;
    }
    if cli.no_declaration {
        options.declaration = false;
    }
    options
}

fn report(summary: &MergeSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Done. {} files processed.", summary.files_processed());
            if summary.files_processed() == 0 {
                println!("Provided input file patterns did not match any file.");
            }
        }
        OutputFormat::Json => println!("{}", format.serialize(summary)?),
    }
    Ok(())
}
