use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;

use docdiff::exec::SystemLocator;
use docdiff::{pipeline, viewer};

#[derive(Parser, Debug)]
#[command(name = "docdiff")]
#[command(about = "View the difference between two documents, or output a normalized \
version of the text in a single file. Supported file types are: pdf, ps, txt.")]
#[command(version)]
struct Args {
    /// One file to normalize to stdout, or two files to diff
    #[arg(required = true, num_args = 1..=2, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Diff viewer name, or a prefix selecting the first match from the
    /// known viewer list
    #[arg(short = 'd', long = "diffviewer", value_name = "PREFIX")]
    diffviewer: Option<String>,

    /// Log progress details to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: logs go to stderr so stdout stays clean for normalized text and
    // viewer output
    let level = if args.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    info!(?args, "parsed CLI arguments");

    // WHY: validate inputs early to fail with a clear error before any
    // conversion work starts
    for file in &args.files {
        if !file.is_file() {
            anyhow::bail!("input file does not exist: {}", file.display());
        }
    }

    let locator = SystemLocator;

    if let Some(ref preference) = args.diffviewer {
        viewer::validate_preference(preference, &locator)?;
    }

    match args.files.as_slice() {
        [single] => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            pipeline::normalize_file(single, &mut out, &locator)?;
        }
        [left, right] => {
            viewer::view_diff(left, right, args.diffviewer.as_deref(), &locator)?;
        }
        _ => unreachable!("clap restricts FILE to one or two paths"),
    }

    Ok(())
}
