// Pairwise similarity — packed storage, cosine scoring, and matrix population.

pub mod cosine;
pub mod engine;
pub mod matrix;
