//! `ingredient-checkr` command line.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Read the ingredient list from the argument, `--file`, or stdin.
//! 3. Load lookup config ([`ingredient_checkr::config::load_config`]).
//! 4. Run the analysis pipeline, online or `--offline`.
//! 5. Render the requested report.
//! 6. Exit `0`, `1` (`--strict` and a High Concern ingredient), or `2` (no usable input).

mod cli;

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use ingredient_checkr::config::load_config;
use ingredient_checkr::report;
use ingredient_checkr::safety::ewg::EwgClient;
use ingredient_checkr::safety::{OfflineSource, SafetySource};
use ingredient_checkr::tokenizer::tokenize;
use ingredient_checkr::{AnalysisResult, AnalysisSession, AnalyzeError, Pipeline};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "INGREDIENT_CHECKR_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let raw = read_input(&cli)?;
    if raw.trim().is_empty() {
        eprintln!("{}", AnalyzeError::EmptyInput);
        std::process::exit(2);
    }

    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if let Some(concurrency) = cli.concurrency {
        config.lookup.concurrency = concurrency;
    }
    if cli.offline {
        config.validate()?;
    } else {
        config.validate_online()?;
    }

    let show_progress = !cli.quiet && matches!(cli.report, ReportFormat::Terminal);
    let outcome = if cli.offline {
        run(Pipeline::new(OfflineSource, 1), &raw, show_progress).await
    } else {
        let client = EwgClient::from_config(&config.lookup)?;
        run(
            Pipeline::new(client, config.lookup.concurrency),
            &raw,
            show_progress,
        )
        .await
    };

    let result = match outcome {
        Ok(result) => result,
        Err(err @ (AnalyzeError::EmptyInput | AnalyzeError::NoIngredients)) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&result, cli.verbose, cli.quiet),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if cli.strict && result.counts.high > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "ingredient_checkr=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    match cli.ingredients.as_deref() {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Ok(String::new());
            }
            let mut buf = String::new();
            stdin.lock().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Run one submission, showing a progress bar and honouring Ctrl-C.
async fn run<S: SafetySource>(
    pipeline: Pipeline<S>,
    raw: &str,
    show_progress: bool,
) -> Result<AnalysisResult, AnalyzeError> {
    let session = AnalysisSession::new(pipeline);

    let pb = if show_progress {
        let pb = ProgressBar::new(tokenize(raw).len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let outcome = tokio::select! {
        outcome = session.submit_with_progress(raw, |name| {
            if let Some(pb) = &pb {
                pb.set_message(name.to_string());
                pb.inc(1);
            }
        }) => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            Err(AnalyzeError::Cancelled)
        }
    };

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    outcome
}
