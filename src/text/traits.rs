// Tokenizer trait — swap-ready abstraction.
//
// The TF-IDF index only needs an ordered token stream per message, so the
// normalization rules can change without touching the rest of the pipeline.

/// Turns raw message text into an ordered sequence of tokens.
pub trait Tokenizer {
    /// Split `text` into tokens. Duplicates are kept, since frequency matters.
    fn tokenize(&self, text: &str) -> Vec<String>;
}
