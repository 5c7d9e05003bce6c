//! Service configuration from environment variables.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `HOST` | `host` |
//! | `PORT` | `port` |
//! | `UPLIFT_BUNDLE` | `bundle_path` |
//! | `UPLIFT_MODEL_ID` | `model_id` |
//! | `UPLIFT_MAX_BATCH` | `max_batch_size` (`0` disables the limit) |
//! | `UPLIFT_PARALLEL` | `scoring.parallel` |
//! | `UPLIFT_MIN_PARALLEL_BATCH` | `scoring.min_parallel_batch` |
//!
//! Unset variables keep their defaults; unparseable values are errors.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use uplift::ServiceConfig;

/// Read the configuration from the process environment.
pub fn from_env() -> Result<ServiceConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a configuration from an arbitrary key lookup.
pub fn from_lookup<F>(lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ServiceConfig::default();

    if let Some(host) = lookup("HOST") {
        config.host = host;
    }
    if let Some(port) = parse(&lookup, "PORT")? {
        config.port = port;
    }
    if let Some(path) = lookup("UPLIFT_BUNDLE") {
        config.bundle_path = PathBuf::from(path);
    }
    if let Some(id) = lookup("UPLIFT_MODEL_ID").filter(|id| !id.trim().is_empty()) {
        config.model_id = Some(id);
    }
    if let Some(limit) = parse::<usize, _>(&lookup, "UPLIFT_MAX_BATCH")? {
        config.max_batch_size = (limit > 0).then_some(limit);
    }
    if let Some(parallel) = parse_bool(&lookup, "UPLIFT_PARALLEL")? {
        config.scoring.parallel = parallel;
    }
    if let Some(min) = parse(&lookup, "UPLIFT_MIN_PARALLEL_BATCH")? {
        config.scoring.min_parallel_batch = min;
    }

    Ok(config)
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} must be a valid number, got '{}'", key, raw))
        })
        .transpose()
}

fn parse_bool<F>(lookup: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow::anyhow!("{} must be a boolean, got '{}'", key, raw)),
        })
        .transpose()
}
