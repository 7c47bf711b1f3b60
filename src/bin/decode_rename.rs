use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use specimen_labels::batch::ConsoleReporter;
use specimen_labels::logging::init_tracing;
use specimen_labels::{BatchRenamer, CandidateOrder, DecoderConfig, ExistingTarget, RenameConfig};

/// Decode specimen label images and copy each specimen/label pair under its accession number
#[derive(Parser)]
#[command(name = "decode_rename", version)]
struct Cli {
    /// Directory holding the specimen and label photographs
    input_dir: PathBuf,
    /// Directory receiving the renamed copies
    output_dir: PathBuf,
    /// Fail a pair instead of overwriting copies that already exist
    #[arg(long)]
    keep_existing: bool,
    /// DataMatrix candidate order: discovery or largest-first
    #[arg(long)]
    candidate_order: Option<CandidateOrder>,
    /// Log decoder internals to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut decoder = DecoderConfig::from_env();
    if let Some(order) = cli.candidate_order {
        decoder = decoder.with_candidate_order(order);
    }
    let config = RenameConfig {
        decoder,
        existing: if cli.keep_existing {
            ExistingTarget::Keep
        } else {
            ExistingTarget::Replace
        },
    };

    let mut reporter = ConsoleReporter;
    BatchRenamer::new(config)
        .run(&cli.input_dir, &cli.output_dir, &mut reporter)
        .with_context(|| format!("batch over {} failed", cli.input_dir.display()))?;

    // partial failures are listed in the report, not signalled by the exit code
    Ok(())
}
