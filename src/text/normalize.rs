// Message text normalizer.
//
// Splits on runs of whitespace, lower-cases each token, then strips one
// trailing run of ASCII punctuation. Punctuation inside a token is kept, so
// "end-to-end," becomes "end-to-end". A token made only of punctuation
// collapses to "" and is still counted as a token.

use super::traits::Tokenizer;

/// The default tokenizer used by the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl Tokenizer for TextNormalizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(normalize_token).collect()
    }
}

/// Normalize a single whitespace-delimited word.
pub fn normalize_token(word: &str) -> String {
    let lower = word.to_lowercase();
    lower
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_string()
}
