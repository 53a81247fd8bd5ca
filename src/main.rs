use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use token_edit_distance::{load_lines, score_corpus};

/// Each line of the hypothesis file is scored against the same line of the
/// reference file. Both files are read as UTF-8.
#[derive(Debug, Parser)]
#[command(name = "character", about = "CharacTER: Character Level Translation Edit Rate")]
struct Cli {
    /// Reference file (`.gz` is decompressed)
    #[arg(short = 'r', long = "ref")]
    reference: PathBuf,

    /// Hypothesis file (`.gz` is decompressed)
    #[arg(short = 'o', long = "hyp")]
    hypothesis: PathBuf,

    /// Print the score of each sentence
    #[arg(short, long)]
    verbose: bool,

    /// Print the full report as JSON instead of the average
    #[arg(long)]
    json: bool,

    /// Worker threads for sentence scoring (default: one per core)
    #[arg(long)]
    jobs: Option<usize>,

    /// Log more (-l: debug, -ll: trace); RUST_LOG overrides
    #[arg(short = 'l', long = "log", action = ArgAction::Count)]
    log: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.log))),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure the scoring thread pool")?;
    }
    info!(threads = rayon::current_num_threads(), "scoring with rayon");

    let hyp_lines = load_lines(&cli.hypothesis)
        .with_context(|| format!("loading hypothesis '{}'", cli.hypothesis.display()))?;
    let ref_lines = load_lines(&cli.reference)
        .with_context(|| format!("loading reference '{}'", cli.reference.display()))?;

    let report = score_corpus(&hyp_lines, &ref_lines).context("scoring corpus")?;

    let non_finite = report.sentences.iter().filter(|s| !s.score.is_finite()).count();
    if non_finite > 0 {
        warn!(non_finite, "some hypotheses are empty; their scores are not finite");
    }

    if cli.json {
        println!("{}", report.to_json_pretty().context("serializing report")?);
        return Ok(());
    }
    if cli.verbose {
        for sentence in &report.sentences {
            println!("CharacTER of sentence {} is {:.4}", sentence.line, sentence.score);
        }
    }
    println!("{}", report.average);
    Ok(())
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "token_edit_distance=warn,character=warn",
        1 => "token_edit_distance=debug,character=debug",
        _ => "token_edit_distance=trace,character=trace",
    }
}
