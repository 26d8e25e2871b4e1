//! Settings for the headless simulation, read from the environment.

use std::str::FromStr;

use anyhow::{Context, Result};

/// Simulation settings
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Seed for both the piece bag and the scripted player
    pub seed: u32,
    /// Simulated time in seconds
    pub seconds: f64,
    /// Sessions to restart after topping out before the run stops
    pub max_restarts: u32,
    /// Print the final snapshot as JSON
    pub snapshot_json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            seconds: 120.0,
            max_restarts: 3,
            snapshot_json: false,
        }
    }
}

impl SimConfig {
    /// Load from environment variables.
    ///
    /// Unset or blank variables keep their defaults; anything that fails to
    /// parse is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let seconds = parse_var(&lookup, "BLOCKFALL_SECONDS")?.unwrap_or(defaults.seconds);
        if !seconds.is_finite() || seconds < 0.0 {
            anyhow::bail!("BLOCKFALL_SECONDS must be a non-negative number, got {seconds}");
        }

        let snapshot_json = match var(&lookup, "BLOCKFALL_SNAPSHOT_JSON") {
            None => defaults.snapshot_json,
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("invalid BLOCKFALL_SNAPSHOT_JSON {raw:?}"))?,
        };

        Ok(Self {
            seed: parse_var(&lookup, "BLOCKFALL_SEED")?.unwrap_or(defaults.seed),
            seconds,
            max_restarts: parse_var(&lookup, "BLOCKFALL_MAX_RESTARTS")?
                .unwrap_or(defaults.max_restarts),
            snapshot_json,
        })
    }

    /// Number of fixed-size frames covering `seconds`
    pub fn frames(&self, delta: f64) -> u64 {
        (self.seconds / delta).round() as u64
    }
}

fn var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(lookup, name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid {name} {raw:?}"))
        })
        .transpose()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected a boolean flag"),
    }
}
