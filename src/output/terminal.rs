// Colored terminal output for classification results.
//
// main.rs delegates all terminal formatting here.

use colored::Colorize;

use crate::message::Message;
use crate::pipeline::batch::Analysis;
use crate::tfidf::index::TfIdfIndex;

/// Display the per-message results table followed by a summary.
pub fn display_results(messages: &[Message], analysis: &Analysis, threshold: f64) {
    println!(
        "\n{}",
        format!(
            "=== Bulk Message Report ({} messages, {} unique terms) ===",
            messages.len(),
            analysis.vocabulary_size()
        )
        .bold()
    );
    println!();

    println!(
        "  {:>5}  {:<32} {:<7}  {:<20}  {}",
        "Index".dimmed(),
        "Receiver".dimmed(),
        "Flagged".dimmed(),
        "Similar to".dimmed(),
        "Body".dimmed(),
    );
    println!("  {}", "-".repeat(100).dimmed());

    for (message, verdict) in messages.iter().zip(&analysis.verdicts) {
        let flagged = if verdict.flagged {
            "Yes".red().bold()
        } else {
            "No".green()
        };
        let peers = if verdict.similar_peers.is_empty() {
            "-".to_string()
        } else {
            verdict
                .similar_peers
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let preview = super::truncate_chars(&super::single_line(&message.body), 40);

        println!(
            "  {:>5}  {:<32} {:<7}  {:<20}  {}",
            verdict.index,
            super::truncate_chars(&message.receiver, 29),
            flagged,
            super::truncate_chars(&peers, 17),
            preview.dimmed(),
        );
    }

    println!();

    let flagged = analysis.flagged_count();
    if flagged > 0 {
        println!(
            "  {} {} of {} messages flagged as bulk (similarity > {:.2})",
            "!!".red().bold(),
            flagged,
            messages.len(),
            threshold
        );
    } else {
        println!(
            "  {} No messages flagged (similarity > {:.2})",
            "ok".green(),
            threshold
        );
    }
}

/// Display each similar pair with its score, strongest first.
pub fn display_similar_pairs(analysis: &Analysis) {
    let mut pairs: Vec<(usize, usize, f32)> = Vec::new();
    for verdict in &analysis.verdicts {
        for &peer in verdict.similar_peers.iter().filter(|&&p| p > verdict.index) {
            if let Ok(score) = analysis.matrix.get(verdict.index, peer) {
                pairs.push((verdict.index, peer, score));
            }
        }
    }
    if pairs.is_empty() {
        return;
    }
    pairs.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    println!("\n{}", format!("=== Similar Pairs ({}) ===", pairs.len()).bold());
    println!();
    for (i, j, score) in pairs {
        println!("  {:>5} ~ {:<5} {:.3}", i, j, colorize_score(score));
    }
    println!();
}

/// Display the heaviest TF-IDF terms of every message.
pub fn display_vocabulary(messages: &[Message], index: &TfIdfIndex, top_n: usize) {
    println!(
        "\n{}",
        format!(
            "=== Vocabulary ({} unique terms over {} messages) ===",
            index.vocabulary().len(),
            messages.len()
        )
        .bold()
    );
    println!();

    for message in messages {
        let terms = index.top_terms(message.index, top_n).unwrap_or_default();
        let rendered: Vec<String> = terms
            .iter()
            .map(|(term, weight)| {
                let shown = if term.is_empty() { "\"\"" } else { term.as_str() };
                format!("{shown} {weight:.3}")
            })
            .collect();
        println!("  {:>5}. {}", message.index, rendered.join(", ").dimmed());
    }
    println!();
}

/// Colorize a similarity score by strength.
fn colorize_score(score: f32) -> colored::ColoredString {
    let text = format!("{score:.3}");
    if score >= 0.75 {
        text.red().bold()
    } else if score >= 0.5 {
        text.bright_red()
    } else {
        text.yellow()
    }
}
