//! Handler configuration, read once at startup.

use thiserror::Error;
use transcoder_core::{
    normalize_prefix, OutputFormat, PipelineConfig, UnknownFormatError,
    DEFAULT_MAX_INPUT_SIZE_BYTES, DEFAULT_PROCESSED_PREFIX,
};

pub const PROCESSED_PREFIX_VAR: &str = "PROCESSED_PREFIX";
pub const MAX_INPUT_SIZE_BYTES_VAR: &str = "MAX_INPUT_SIZE_BYTES";
pub const DEFAULT_OUTPUT_FORMAT_VAR: &str = "DEFAULT_OUTPUT_FORMAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PROCESSED_PREFIX must not be empty")]
    EmptyPrefix,

    #[error("MAX_INPUT_SIZE_BYTES must be a positive integer, got {0:?}")]
    InvalidSize(String),

    #[error("DEFAULT_OUTPUT_FORMAT: {0}")]
    InvalidFormat(#[from] UnknownFormatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Outputs are written under this prefix, and keys under it are skipped.
    pub processed_prefix: String,
    /// Largest reported object size accepted.
    pub max_input_size_bytes: u64,
    /// Output format when neither the source nor its alpha decide.
    pub default_format: OutputFormat,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            processed_prefix: DEFAULT_PROCESSED_PREFIX.to_string(),
            max_input_size_bytes: DEFAULT_MAX_INPUT_SIZE_BYTES,
            default_format: OutputFormat::Jpeg,
        }
    }
}

impl HandlerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Unset variables take their
    /// defaults; set but invalid ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(prefix) = lookup(PROCESSED_PREFIX_VAR) {
            if prefix.trim_end_matches('/').is_empty() {
                return Err(ConfigError::EmptyPrefix);
            }
            config.processed_prefix = normalize_prefix(&prefix);
        }

        if let Some(raw) = lookup(MAX_INPUT_SIZE_BYTES_VAR) {
            config.max_input_size_bytes = match raw.trim().parse::<u64>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidSize(raw)),
            };
        }

        if let Some(raw) = lookup(DEFAULT_OUTPUT_FORMAT_VAR) {
            config.default_format = raw.parse()?;
        }

        Ok(config)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            default_format: self.default_format,
            ..PipelineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.processed_prefix, "processed/");
        assert_eq!(config.max_input_size_bytes, 52_428_800);
        assert_eq!(config.default_format, OutputFormat::Jpeg);
        assert_eq!(config, HandlerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = HandlerConfig::from_lookup(lookup(&[
            ("PROCESSED_PREFIX", "thumbs/"),
            ("MAX_INPUT_SIZE_BYTES", "1024"),
            ("DEFAULT_OUTPUT_FORMAT", "WebP"),
        ]))
        .unwrap();

        assert_eq!(config.processed_prefix, "thumbs/");
        assert_eq!(config.max_input_size_bytes, 1024);
        assert_eq!(config.default_format, OutputFormat::WebP);
        assert_eq!(config.pipeline_config().default_format, OutputFormat::WebP);
        assert_eq!(config.pipeline_config().target_width, 256);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        for raw in ["", "/", "//"] {
            let result = HandlerConfig::from_lookup(lookup(&[("PROCESSED_PREFIX", raw)]));
            assert!(matches!(result, Err(ConfigError::EmptyPrefix)), "{raw:?} was accepted");
        }
    }

    #[test]
    fn test_prefix_is_normalized() {
        for (raw, expected) in [("out//", "out/"), ("out", "out/"), ("a/b/", "a/b/")] {
            let config = HandlerConfig::from_lookup(lookup(&[("PROCESSED_PREFIX", raw)])).unwrap();
            assert_eq!(config.processed_prefix, expected);
        }
    }

    #[test]
    fn test_invalid_size_rejected() {
        for raw in ["0", "-5", "lots", "1.5"] {
            let result = HandlerConfig::from_lookup(lookup(&[("MAX_INPUT_SIZE_BYTES", raw)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidSize(ref v)) if v == raw),
                "{raw} was accepted"
            );
        }
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = HandlerConfig::from_lookup(lookup(&[("DEFAULT_OUTPUT_FORMAT", "gif")]));
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }
}
