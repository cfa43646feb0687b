use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use bulkscan::config::Config;
use bulkscan::message::load_messages;
use bulkscan::output::json::Report;
use bulkscan::output::terminal;
use bulkscan::pipeline::batch::{analyze, build_index};

/// Bulkscan: flag bulk and spam-like messages in a batch.
///
/// Weights each message's words with TF-IDF, compares every pair of messages
/// by cosine similarity, and flags messages that look like too many others.
#[derive(Parser)]
#[command(name = "bulkscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a JSON batch of messages
    Analyze {
        /// JSON file holding an array of {"receiver", "body"} objects
        file: PathBuf,

        /// Similarity above which two messages count as similar (default: 0.32)
        #[arg(long)]
        threshold: Option<f64>,

        /// Similar messages allowed before a message is flagged (default: 0)
        #[arg(long)]
        max_similar: Option<usize>,

        /// Print a JSON report instead of the table
        #[arg(long)]
        json: bool,

        /// Include the packed similarity matrix in the JSON report
        #[arg(long, requires = "json")]
        matrix: bool,

        /// Score pairs on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Show the vocabulary and each message's heaviest TF-IDF terms
    Vocab {
        /// JSON file holding an array of {"receiver", "body"} objects
        file: PathBuf,

        /// Terms to show per message (default: 8)
        #[arg(long, default_value = "8")]
        top: usize,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bulkscan=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            threshold,
            max_similar,
            json,
            matrix,
            sequential,
        } => {
            let mut config = Config::load()?;
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }
            if let Some(max_similar) = max_similar {
                config.max_similar_peers = max_similar;
            }
            if sequential {
                config.parallel = false;
            }
            config.validate()?;

            let messages = load_messages(&file)?;
            let params = config.run_params(!json);
            let analysis = analyze(&messages, &params)?;

            if json {
                let report = Report::new(
                    &messages,
                    &analysis,
                    params.threshold,
                    params.max_similar_peers,
                    matrix,
                );
                println!("{}", report.to_json()?);
            } else {
                terminal::display_results(&messages, &analysis, params.threshold);
                terminal::display_similar_pairs(&analysis);
            }

            info!(
                flagged = analysis.flagged_count(),
                computed = analysis.stats.computed,
                "Run finished"
            );
        }

        Commands::Vocab { file, top } => {
            let messages = load_messages(&file)?;
            // Weights only; no pair is scored
            let index = build_index(&messages)?;
            terminal::display_vocabulary(&messages, &index, top);
            println!(
                "{}",
                "Empty-string terms (\"\") come from punctuation-only words.".dimmed()
            );
        }
    }

    Ok(())
}
