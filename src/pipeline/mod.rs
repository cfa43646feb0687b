// Pipeline orchestration — the batch analysis that chains every stage.

pub mod batch;
