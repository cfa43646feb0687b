use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::pipeline::batch::RunParams;

/// Run defaults loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; CLI flags override
/// anything set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// BULKSCAN_THRESHOLD (default 0.32)
    pub threshold: f64,
    /// BULKSCAN_MAX_SIMILAR (default 0)
    pub max_similar_peers: usize,
    /// BULKSCAN_PARALLEL (default true)
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        let params = RunParams::default();
        Self {
            threshold: params.threshold,
            max_similar_peers: params.max_similar_peers,
            parallel: params.parallel,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set but unparseable ones are errors.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            threshold: parse_var(&lookup, "BULKSCAN_THRESHOLD")?.unwrap_or(defaults.threshold),
            max_similar_peers: parse_var(&lookup, "BULKSCAN_MAX_SIMILAR")?
                .unwrap_or(defaults.max_similar_peers),
            parallel: parse_var(&lookup, "BULKSCAN_PARALLEL")?.unwrap_or(defaults.parallel),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the threshold is usable before any messages are loaded.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            anyhow::bail!(
                "Similarity threshold must be between 0 and 1 (got {}).\n\
                 Set BULKSCAN_THRESHOLD or pass --threshold; 0.32 is a good starting point.",
                self.threshold
            );
        }
        Ok(())
    }

    /// Turn the config into pipeline parameters.
    pub fn run_params(&self, show_progress: bool) -> RunParams {
        RunParams {
            threshold: self.threshold,
            max_similar_peers: self.max_similar_peers,
            parallel: self.parallel,
            show_progress,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
    }
}
