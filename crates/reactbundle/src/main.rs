//! ReactBundle - bundle a project's text files into a single file.

use anyhow::Context;
use clap::Parser;
use reactbundle_bundler::{BundleConfig, DEFAULT_OUTPUT_FILE};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "reactbundle")]
#[command(
    author,
    version,
    about = "Concatenate a project's text files into one bundle, skipping node_modules and package-lock.json"
)]
struct Cli {
    /// Project directory to bundle
    #[arg(default_value = ".")]
    project_path: PathBuf,

    /// Bundle file to create or overwrite
    #[arg(default_value = DEFAULT_OUTPUT_FILE)]
    output_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries only the confirmation line
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = BundleConfig {
        project_path: cli.project_path,
        output_file: cli.output_file,
    };

    let summary = reactbundle_bundler::bundle(&config)
        .with_context(|| format!("Failed to bundle {}", config.project_path.display()))?;
    debug!("{:?}", summary);

    println!("Bundle created: {}", config.output_file.display());

    Ok(())
}
