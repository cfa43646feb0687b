// TF-IDF weighting over a frozen corpus vocabulary.

pub mod index;
pub mod vocabulary;
