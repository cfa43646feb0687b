// Text normalization — whitespace tokenization and token cleanup.

pub mod normalize;
pub mod traits;
