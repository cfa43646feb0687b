// Bulkscan: bulk message detection for a batch of messages.
//
// This is the library root. Each module corresponds to a stage of the
// analysis pipeline; main.rs is the only place that does I/O.

pub mod classify;
pub mod config;
pub mod error;
pub mod message;
pub mod output;
pub mod pipeline;
pub mod similarity;
pub mod text;
pub mod tfidf;
