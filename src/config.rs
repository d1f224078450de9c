use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DATA_DIR: &str = "playlist_records";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Knobs of the playlist-build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Upper bound on tracks put into a playlist.
    pub target_tracks: usize,
    /// Below this many selected tracks, catalog search tops up the draft.
    pub min_tracks: usize,
    /// How many ranked genres the genre aggregator returns.
    pub genre_limit: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            target_tracks: 30,
            min_tracks: 20,
            genre_limit: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub pipeline: PipelineSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            pipeline: PipelineSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    /// for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pipeline_defaults = PipelineSettings::default();

        let bind_addr = lookup("VIBEWISE_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let data_dir = lookup("VIBEWISE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let timeout_secs = parse_or(
            &lookup,
            "VIBEWISE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let pipeline = PipelineSettings {
            target_tracks: parse_or(
                &lookup,
                "VIBEWISE_TARGET_TRACKS",
                pipeline_defaults.target_tracks,
            )?,
            min_tracks: parse_or(&lookup, "VIBEWISE_MIN_TRACKS", pipeline_defaults.min_tracks)?,
            genre_limit: parse_or(
                &lookup,
                "VIBEWISE_GENRE_LIMIT",
                pipeline_defaults.genre_limit,
            )?,
        };

        Ok(Self {
            bind_addr,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            pipeline,
        })
    }

    pub fn get_config_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.request_timeout.is_zero() {
            problems.push("VIBEWISE_REQUEST_TIMEOUT_SECS must be greater than 0".to_string());
        }
        if self.pipeline.target_tracks == 0 {
            problems.push("VIBEWISE_TARGET_TRACKS must be greater than 0".to_string());
        }
        if self.pipeline.min_tracks > self.pipeline.target_tracks {
            problems.push("VIBEWISE_MIN_TRACKS must not exceed VIBEWISE_TARGET_TRACKS".to_string());
        }
        if self.pipeline.genre_limit == 0 {
            problems.push("VIBEWISE_GENRE_LIMIT must be greater than 0".to_string());
        }

        problems
    }

    pub fn is_valid(&self) -> bool {
        self.get_config_problems().is_empty()
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} is not a valid number: {}", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.pipeline, PipelineSettings::default());
        assert!(config.is_valid());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("VIBEWISE_BIND_ADDR", "0.0.0.0:9000"),
            ("VIBEWISE_TARGET_TRACKS", "50"),
            ("VIBEWISE_MIN_TRACKS", " 25 "),
            ("VIBEWISE_REQUEST_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.pipeline.target_tracks, 50);
        assert_eq!(config.pipeline.min_tracks, 25);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("VIBEWISE_TARGET_TRACKS", "lots")]))
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_minimum_above_target_is_reported() {
        let config = Config::from_lookup(lookup_from(&[
            ("VIBEWISE_TARGET_TRACKS", "10"),
            ("VIBEWISE_MIN_TRACKS", "20"),
        ]))
        .unwrap();

        let problems = config.get_config_problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("VIBEWISE_MIN_TRACKS"));
        assert!(!config.is_valid());
    }
}
