// Unit tests for text normalization.
//
// Covers the tokenizer contract: whitespace splitting, lower-casing, and
// stripping exactly one trailing run of punctuation.

use bulkscan::text::normalize::{normalize_token, TextNormalizer};
use bulkscan::text::traits::Tokenizer;

// ============================================================
// normalize_token
// ============================================================

#[test]
fn token_is_lowercased() {
    assert_eq!(normalize_token("HeLLo"), "hello");
}

#[test]
fn internal_punctuation_is_preserved() {
    assert_eq!(normalize_token("end-to-end"), "end-to-end");
    assert_eq!(normalize_token("e.g.,"), "e.g");
    assert_eq!(normalize_token("don't"), "don't");
}

#[test]
fn only_trailing_run_is_stripped() {
    assert_eq!(normalize_token("wow!!!"), "wow");
    assert_eq!(normalize_token("\"quoted\""), "\"quoted");
    assert_eq!(normalize_token("...leading"), "...leading");
}

#[test]
fn punctuation_only_token_becomes_empty() {
    assert_eq!(normalize_token("!?"), "");
    assert_eq!(normalize_token("-"), "");
}

#[test]
fn non_ascii_letters_survive() {
    assert_eq!(normalize_token("Größe."), "größe");
}

// ============================================================
// TextNormalizer::tokenize
// ============================================================

#[test]
fn tokenize_reference_sentence() {
    let tokens = TextNormalizer.tokenize("Best email service: end-to-end, encrypted and no ads.");
    assert_eq!(
        tokens,
        vec!["best", "email", "service", "end-to-end", "encrypted", "and", "no", "ads"]
    );
}

#[test]
fn tokenize_keeps_duplicates_in_order() {
    let tokens = TextNormalizer.tokenize("Buy now. BUY NOW! buy now");
    assert_eq!(tokens, vec!["buy", "now", "buy", "now", "buy", "now"]);
}

#[test]
fn tokenize_counts_punctuation_only_words() {
    let tokens = TextNormalizer.tokenize("Free ! money");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1], "");
}

#[test]
fn tokenize_empty_body_is_empty() {
    assert!(TextNormalizer.tokenize("").is_empty());
    assert!(TextNormalizer.tokenize("\r\n  \t").is_empty());
}

#[test]
fn tokenize_word_count_matches_whitespace_split() {
    let body = "Best email service: end-to-end encrypted and no ads.";
    assert_eq!(TextNormalizer.tokenize(body).len(), 8);
}
