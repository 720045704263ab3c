//! Extractor options loaded from an optional TOML file.
//!
//! The library never reads configuration on its own: callers build an
//! [`ExtractorConfig`] (or load one with [`ExtractorConfig::load`]) and pass
//! it explicitly to the functions that need it. A missing file yields
//! `ExtractorConfig::default()`.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::content::DEFAULT_POST_WORD_LIMIT;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Options shared by the normalization pipeline and feed discovery.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum number of words kept by post content truncation.
    pub post_word_limit: usize,

    /// Entry field holding the date used by `normalize_entry`.
    pub date_field: String,

    /// MIME types accepted by discovery in addition to the built-in feed types.
    pub extra_feed_types: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            post_word_limit: DEFAULT_POST_WORD_LIMIT,
            date_field: "updated_parsed".to_string(),
            extra_feed_types: Vec::new(),
        }
    }
}

const KNOWN_KEYS: [&str; 3] = ["post_word_limit", "date_field", "extra_feed_types"];

impl ExtractorConfig {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(ExtractorConfig::default())`
    /// - Empty file → `Ok(ExtractorConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Blank text yields the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: ExtractorConfig = toml::from_str(content)?;
        tracing::debug!(
            post_word_limit = config.post_word_limit,
            date_field = %config.date_field,
            extra_feed_types = config.extra_feed_types.len(),
            "Loaded extractor configuration"
        );
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("feedmeta_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert_eq!(config.post_word_limit, DEFAULT_POST_WORD_LIMIT);
        assert_eq!(config.date_field, "updated_parsed");
        assert!(config.extra_feed_types.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedmeta_test_nonexistent_config.toml");
        let config = ExtractorConfig::load(path).unwrap();
        assert_eq!(config, ExtractorConfig::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = temp_config("whitespace", "   \n  \n  ");
        let config = ExtractorConfig::load(&path).unwrap();
        assert_eq!(config, ExtractorConfig::default());
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = temp_config("partial", "post_word_limit = 25\n");
        let config = ExtractorConfig::load(&path).unwrap();
        assert_eq!(config.post_word_limit, 25);
        assert_eq!(config.date_field, "updated_parsed");
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
post_word_limit = 120
date_field = "published_parsed"
extra_feed_types = ["application/x-netcdf", "text/xml"]
"#;
        let path = temp_config("full", content);
        let config = ExtractorConfig::load(&path).unwrap();
        assert_eq!(config.post_word_limit, 120);
        assert_eq!(config.date_field, "published_parsed");
        assert_eq!(
            config.extra_feed_types,
            vec!["application/x-netcdf".to_string(), "text/xml".to_string()]
        );
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = ExtractorConfig::from_toml("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let result = ExtractorConfig::from_toml("post_word_limit = \"many\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config =
            ExtractorConfig::from_toml("date_field = \"date_parsed\"\nbogus = 42\n").unwrap();
        assert_eq!(config.date_field, "date_parsed");
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = temp_config("too_large", &"a".repeat(1_048_577));
        let err = ExtractorConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }
}
