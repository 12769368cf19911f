//! CLI configuration.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (later sources override earlier ones):
//! 1. Global config: `~/.config/charvault/config.json`
//! 2. Environment variable: `CHARVAULT_CONFIG_CONTENT`
//! 3. Project config: `charvault.json` or `charvault.jsonc` in the working directory
//!
//! Files may contain `//` and `/* */` comments.

use charvault_snapshot::ReviewConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON/JSONC syntax.
    #[error("invalid config at {path}: {message}")]
    InvalidJson { path: String, message: String },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level: trace, debug, info, warn or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Where characters and snapshots are stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Review view settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewConfig>,
}

impl Config {
    /// Merge another config into this one. Fields set in `other` win.
    pub fn merge(mut self, other: Self) -> Self {
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        if other.review.is_some() {
            self.review = other.review;
        }
        self
    }

    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it was read from.
    pub async fn load(project_dir: Option<&Path>) -> ConfigResult<(Self, Vec<PathBuf>)> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        if let Some(global_dir) = charvault_util::path::config_dir() {
            for name in &["config.json", "config.jsonc"] {
                let path = global_dir.join(name);
                if path.exists() {
                    config = config.merge(Self::load_file(&path).await?);
                    sources.push(path);
                    break;
                }
            }
        }

        if let Ok(content) = std::env::var("CHARVAULT_CONFIG_CONTENT") {
            config = config.merge(Self::parse_jsonc(&content, "<env>")?);
        }

        if let Some(dir) = project_dir {
            for name in &["charvault.jsonc", "charvault.json"] {
                let path = dir.join(name);
                if path.exists() {
                    config = config.merge(Self::load_file(&path).await?);
                    sources.push(path);
                    break;
                }
            }
        }

        Ok((config, sources))
    }

    async fn load_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Review settings, defaulted.
    pub fn review(&self) -> ReviewConfig {
        self.review.clone().unwrap_or_default()
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> ConfigResult<Self> {
        let stripped = Self::strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| ConfigError::InvalidJson {
            path: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Strip JSON comments, leaving string contents alone.
    fn strip_comments(input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        let mut in_string = false;
        let mut escape_next = false;

        while let Some(c) = chars.next() {
            if escape_next {
                result.push(c);
                escape_next = false;
                continue;
            }

            if c == '\\' && in_string {
                result.push(c);
                escape_next = true;
                continue;
            }

            if c == '"' {
                in_string = !in_string;
                result.push(c);
                continue;
            }

            if in_string {
                result.push(c);
                continue;
            }

            if c == '/' {
                match chars.peek() {
                    Some('/') => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == '\n' {
                                result.push('\n');
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        chars.next();
                        let mut prev = ' ';
                        for c in chars.by_ref() {
                            if prev == '*' && c == '/' {
                                break;
                            }
                            // Keep line numbers in parse errors accurate.
                            if c == '\n' {
                                result.push('\n');
                            }
                            prev = c;
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            result.push(c);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_strip_comments() {
        let input = r#"{
            // line comment
            "log_level": "debug", /* block
            comment */ "data_dir": "/tmp/vault"
        }"#;
        let config = Config::parse_jsonc(input, "test").unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/vault")));
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let input = r#"{"data_dir": "/srv//vault/*x*/"}"#;
        let config = Config::parse_jsonc(input, "test").unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv//vault/*x*/")));
    }

    #[test]
    fn test_invalid_json_names_source() {
        let err = Config::parse_jsonc("{ nope", "charvault.json").unwrap_err();
        assert!(err.to_string().contains("charvault.json"));
    }

    #[test]
    fn test_merge_later_wins() {
        let base = Config {
            log_level: Some("info".to_string()),
            data_dir: Some(PathBuf::from("/a")),
            review: None,
        };
        let project = Config {
            log_level: None,
            data_dir: Some(PathBuf::from("/b")),
            review: Some(ReviewConfig {
                show_unchanged: true,
                ..Default::default()
            }),
        };

        let merged = base.merge(project);
        assert_eq!(merged.log_level.as_deref(), Some("info"));
        assert_eq!(merged.data_dir, Some(PathBuf::from("/b")));
        assert!(merged.review().show_unchanged);
    }

    #[tokio::test]
    async fn test_load_project_config() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("charvault.jsonc"),
            "{\n  // review tweaks\n  \"review\": { \"max_preview_lines\": 4 }\n}",
        )
        .unwrap();

        let (config, sources) = Config::load(Some(dir.path())).await.unwrap();
        assert_eq!(config.review().max_preview_lines, 4);
        assert!(sources.contains(&dir.path().join("charvault.jsonc")));
    }
}
